//! Tests for perception probe.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::perception::{LayerMask, PerceptionProbe, TargetSnapshot};

    fn target(x: f32, z: f32, layer: u8) -> TargetSnapshot {
        TargetSnapshot {
            position: Vec3::new(x, 0.0, z),
            radius: 0.0,
            layer,
        }
    }

    #[test]
    fn test_distance_to() {
        let d = PerceptionProbe::distance_to(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_cast_hits_target_ahead() {
        let hit = PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::Z,
            1.0,
            6.0,
            LayerMask::ALL,
            &[target(0.5, 4.0, 0)],
        )
        .expect("target inside swept volume");

        assert_eq!(hit.target_index, 0);
        assert!(hit.distance > 0.0 && hit.distance < 4.0, "distance = {}", hit.distance);
        assert!(hit.point.distance(Vec3::new(0.5, 0.0, 4.0)) < 1e-5);
    }

    #[test]
    fn test_cast_misses_target_behind() {
        let hit = PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::Z,
            1.0,
            6.0,
            LayerMask::ALL,
            &[target(0.0, -3.0, 0)],
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_cast_misses_target_beyond_range_and_width() {
        let far = target(0.0, 10.0, 0);
        let wide = target(3.0, 3.0, 0);

        let hit = PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::Z,
            1.0,
            6.0,
            LayerMask::ALL,
            &[far, wide],
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_cast_respects_layer_mask() {
        let hit = PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::Z,
            1.0,
            6.0,
            LayerMask::layer(3),
            &[target(0.0, 2.0, 5)],
        );
        assert!(hit.is_none());

        let hit = PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::Z,
            1.0,
            6.0,
            LayerMask::layer(3),
            &[target(0.0, 2.0, 3)],
        );
        assert!(hit.is_some());
    }

    #[test]
    fn test_cast_returns_nearest_of_several() {
        let hit = PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::Z,
            0.5,
            10.0,
            LayerMask::ALL,
            &[target(0.0, 8.0, 0), target(0.0, 3.0, 0), target(0.0, 5.0, 0)],
        )
        .unwrap();

        assert_eq!(hit.target_index, 1);
        assert!((hit.distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_cast_overlap_at_origin_is_zero_distance() {
        let hit = PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::Z,
            2.0,
            6.0,
            LayerMask::ALL,
            &[target(1.0, -1.0, 0)],
        )
        .unwrap();

        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_cast_with_zero_forward_only_checks_overlap() {
        let miss = PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::ZERO,
            1.0,
            6.0,
            LayerMask::ALL,
            &[target(0.0, 3.0, 0)],
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_target_radius_widens_volume() {
        let mut fat = target(2.0, 4.0, 0);
        assert!(PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::Z,
            1.0,
            6.0,
            LayerMask::ALL,
            &[fat]
        )
        .is_none());

        fat.radius = 1.5;
        assert!(PerceptionProbe::volumetric_cast(
            Vec3::ZERO,
            Vec3::Z,
            1.0,
            6.0,
            LayerMask::ALL,
            &[fat]
        )
        .is_some());
    }

    #[test]
    fn test_layer_mask_bits() {
        let mask = LayerMask::layer(1).with(4);
        assert!(mask.contains(1));
        assert!(mask.contains(4));
        assert!(!mask.contains(2));
        assert!(!LayerMask::NONE.contains(0));
        assert!(LayerMask::ALL.contains(31));
    }
}
