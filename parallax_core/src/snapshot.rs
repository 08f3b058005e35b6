// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-eye transform snapshots.
//!
//! Each frame the compositor needs, per eye, the model and camera transforms
//! that place a layer in world space. [`TransformSnapshot::capture`] computes
//! them from the layer's placement node and the active eye camera. It is a
//! pure function: it reads both inputs, allocates nothing on the GPU, and
//! mutates no external state.

use glam::{Mat4, Quat, Vec3};

/// A 2-D rectangular UI element attached to a placement node.
///
/// Rect-backed nodes (panels, HUDs) size the layer from the rectangle rather
/// than from the node's own scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UiRect {
    /// Rect width in local units.
    pub width: f32,
    /// Rect height in local units.
    pub height: f32,
    /// Rect center in the node's local space.
    pub center: Vec3,
}

/// The scene-graph node a layer is placed by.
///
/// A value snapshot of the engine-owned node, refreshed by the host through
/// [`CompositionContext::set_placement_node`](crate::context::CompositionContext::set_placement_node).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementNode {
    /// Whether the node is active in the scene. Inactive nodes produce no
    /// snapshot and the layer keeps its previous pose.
    pub active: bool,
    /// Local-to-world transform.
    pub local_to_world: Mat4,
    /// World-space position.
    pub position: Vec3,
    /// World-space rotation.
    pub rotation: Quat,
    /// Lossy (accumulated) world scale.
    pub lossy_scale: Vec3,
    /// Present when the node is a 2-D rectangular UI element.
    pub ui_rect: Option<UiRect>,
}

/// One eye's camera pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeCamera {
    /// World-to-camera transform.
    pub world_to_camera: Mat4,
    /// World-space camera position.
    pub position: Vec3,
    /// World-space camera rotation.
    pub rotation: Quat,
}

/// The per-eye placement data recorded for the compositor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSnapshot {
    /// `camera.world_to_camera * node.local_to_world`.
    pub model_view: Mat4,
    /// Model scale (rect-derived for UI nodes).
    pub scale: Vec3,
    /// Model world rotation.
    pub rotation: Quat,
    /// Model world translation (rect center for UI nodes).
    pub translation: Vec3,
    /// Camera world rotation.
    pub camera_rotation: Quat,
    /// Camera world translation.
    pub camera_translation: Vec3,
}

impl TransformSnapshot {
    /// Captures the placement of `node` as seen by `camera`.
    ///
    /// Returns `None` when the node is inactive, leaving any previously
    /// recorded snapshot untouched.
    #[must_use]
    pub fn capture(node: &PlacementNode, camera: &EyeCamera) -> Option<Self> {
        if !node.active {
            return None;
        }

        let (scale, translation) = match node.ui_rect {
            Some(rect) => (
                Vec3::new(
                    rect.width * node.lossy_scale.x,
                    rect.height * node.lossy_scale.y,
                    1.0,
                ),
                node.local_to_world.transform_point3(rect.center),
            ),
            None => (node.lossy_scale, node.position),
        };

        Some(Self {
            model_view: camera.world_to_camera * node.local_to_world,
            scale,
            rotation: node.rotation,
            translation,
            camera_rotation: camera.rotation,
            camera_translation: camera.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_node() -> PlacementNode {
        PlacementNode {
            active: true,
            local_to_world: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.5),
            lossy_scale: Vec3::new(2.0, 2.0, 2.0),
            ui_rect: None,
        }
    }

    fn camera_at(position: Vec3) -> EyeCamera {
        EyeCamera {
            world_to_camera: Mat4::from_translation(-position),
            position,
            rotation: Quat::IDENTITY,
        }
    }

    #[test]
    fn inactive_node_produces_no_snapshot() {
        let mut node = plain_node();
        node.active = false;
        assert!(TransformSnapshot::capture(&node, &camera_at(Vec3::ZERO)).is_none());
    }

    #[test]
    fn plain_node_uses_world_pose() {
        let node = plain_node();
        let snap = TransformSnapshot::capture(&node, &camera_at(Vec3::ZERO)).unwrap();
        assert_eq!(snap.scale, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(snap.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(snap.rotation, node.rotation);
    }

    #[test]
    fn model_view_composes_camera_and_node() {
        let node = plain_node();
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let snap = TransformSnapshot::capture(&node, &camera).unwrap();

        let expected = camera.world_to_camera * node.local_to_world;
        assert_eq!(snap.model_view, expected);
        // The composed transform moves the node origin into camera space.
        let origin = snap.model_view.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn ui_rect_scales_by_rect_extent() {
        let mut node = plain_node();
        node.ui_rect = Some(UiRect {
            width: 4.0,
            height: 3.0,
            center: Vec3::new(0.5, 0.5, 0.0),
        });
        let snap = TransformSnapshot::capture(&node, &camera_at(Vec3::ZERO)).unwrap();

        // scale = (rect.w * lossy.x, rect.h * lossy.y, 1)
        assert_eq!(snap.scale, Vec3::new(8.0, 6.0, 1.0));
        // translation = world-transformed rect center, not the node position.
        let expected = node.local_to_world.transform_point3(Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(snap.translation, expected);
    }

    #[test]
    fn camera_pose_is_recorded_verbatim() {
        let node = plain_node();
        let camera = EyeCamera {
            world_to_camera: Mat4::IDENTITY,
            position: Vec3::new(0.1, 1.6, 0.0),
            rotation: Quat::from_rotation_x(-0.2),
        };
        let snap = TransformSnapshot::capture(&node, &camera).unwrap();
        assert_eq!(snap.camera_translation, camera.position);
        assert_eq!(snap.camera_rotation, camera.rotation);
    }
}
