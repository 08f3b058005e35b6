// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swap-chain lifecycle and per-frame synchronization for HMD compositor layers.
//!
//! `parallax_core` manages the client side of a stereo head-mounted display's
//! composition contract: applications register visual surfaces (*layers*) of
//! several projection shapes, each backed by one or two multi-buffered native
//! swap chains, and an external compositor presents them. This crate owns
//! allocation, shape/format negotiation, multi-buffer rotation, clone layers
//! that alias another layer's images, per-eye transform snapshots, and
//! idempotent teardown. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! The crate is organized around a once-per-frame loop driven by the host
//! engine:
//!
//! ```text
//!   host engine (render loop)
//!       │
//!       ▼
//!   CompositionContext::on_frame_begin()
//!       │   for each layer in depth order:
//!       ├─► rotate write slot (if last frame copied)
//!       ├─► retry pending allocations ──► CompositorApi (native boundary)
//!       ├─► TransformSnapshot::capture()
//!       └─► sync::sync_frame() ──► TextureCopier (blit boundary)
//!                                        │
//!   external compositor consumes slots ◄─┘  at present time, in depth order
//! ```
//!
//! **[`shape`]** — Projection-shape descriptors: face count, per-face blit
//! rotation, placement parameter kind for quad/cylinder/equirect/cube/eac.
//!
//! **[`layer`]** — The layer data model: identity handles, parameter blocks,
//! per-eye source textures and swap chains, lifecycle states.
//!
//! **[`registry`]** — Depth-ordered collection of live layers with
//! transactional insert/remove and lazy resorting.
//!
//! **[`swapchain`]** — Wraps compositor-allocated native images into per-eye
//! slot lists and enforces the rotation invariant.
//!
//! **[`sync`]** — The per-frame copy step: fast-path copies when formats
//! already match, color-space-converting blits otherwise, cubemap face
//! handling, skip-and-retry failure semantics.
//!
//! **[`snapshot`]** — Pure per-eye model/camera transform capture.
//!
//! **[`clone`]** — Explicit index from original layers to the clones aliasing
//! their images, consulted on teardown and texture replacement.
//!
//! **[`context`]** — The lifecycle controller tying the above together and
//! exposing the host-facing operations.
//!
//! **[`compositor`]** — The [`CompositorApi`](compositor::CompositorApi) and
//! [`TextureCopier`](compositor::TextureCopier) traits that platform
//! integrations implement.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod clone;
pub mod compositor;
pub mod context;
pub mod error;
pub mod format;
pub mod layer;
pub mod registry;
pub mod shape;
pub mod snapshot;
pub mod swapchain;
pub mod sync;
pub mod trace;
