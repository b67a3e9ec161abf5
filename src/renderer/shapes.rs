//! Shared box meshes and per-frame instance lists
//!
//! Every non-terrain object is a box: one car-shaped mesh for the player and
//! pursuers, one unit block for buildings, puddles and projectiles. A frame
//! only rebuilds the instance transforms.

use glam::{Mat4, Quat, Vec3};

use super::vertex::{Instance, colors};
use crate::sim::{TerrainVertex, WorldSnapshot};

/// Puddle decals sit just above the ground to avoid z-fighting
const PUDDLE_LIFT: f32 = 0.01;
const PUDDLE_THICKNESS: f32 = 0.01;
const PROJECTILE_SIZE: f32 = 0.2;

/// Vertices and triangle indices for a shared mesh
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

impl BoxMesh {
    /// Box spanning `min..max`, 4 vertices per face so faces shade flat
    pub fn new(min: Vec3, max: Vec3) -> Self {
        let corners = |face: [[f32; 3]; 4]| face.map(|p| TerrainVertex::new(p, [1.0, 1.0, 1.0]));
        let (a, b) = (min, max);
        let faces = [
            // -Z, +Z
            [[a.x, a.y, a.z], [b.x, a.y, a.z], [b.x, b.y, a.z], [a.x, b.y, a.z]],
            [[a.x, a.y, b.z], [b.x, a.y, b.z], [b.x, b.y, b.z], [a.x, b.y, b.z]],
            // -X, +X
            [[a.x, a.y, a.z], [a.x, a.y, b.z], [a.x, b.y, b.z], [a.x, b.y, a.z]],
            [[b.x, a.y, a.z], [b.x, a.y, b.z], [b.x, b.y, b.z], [b.x, b.y, a.z]],
            // +Y, -Y
            [[a.x, b.y, a.z], [b.x, b.y, a.z], [b.x, b.y, b.z], [a.x, b.y, b.z]],
            [[a.x, a.y, a.z], [b.x, a.y, a.z], [b.x, a.y, b.z], [a.x, a.y, b.z]],
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for face in faces {
            let base = vertices.len() as u32;
            vertices.extend(corners(face));
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self { vertices, indices }
    }

    /// 2 wide, 1 tall, 4 long, resting on y = 0, nose toward +Z
    pub fn car() -> Self {
        Self::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 2.0))
    }

    /// Unit footprint centered on the origin, y from 0 to 1
    pub fn block() -> Self {
        Self::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5))
    }
}

/// Instances for one frame, grouped by the mesh they draw
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneInstances {
    /// Drawn with `BoxMesh::car`
    pub cars: Vec<Instance>,
    /// Drawn with `BoxMesh::block`
    pub blocks: Vec<Instance>,
    /// Drawn with `BoxMesh::block`, alpha blended
    pub decals: Vec<Instance>,
}

impl SceneInstances {
    pub fn from_snapshot(snapshot: &WorldSnapshot<'_>) -> Self {
        let mut scene = Self::default();

        let car = snapshot.vehicle;
        let heading = Quat::from_rotation_y(car.visual_heading());
        scene.cars.push(Instance::new(
            Mat4::from_rotation_translation(heading, car.position),
            colors::PLAYER,
        ));
        scene.cars.extend(snapshot.pursuers.iter().map(|p| {
            Instance::new(
                Mat4::from_rotation_translation(Quat::from_rotation_y(p.rotation), p.position),
                colors::PURSUER,
            )
        }));

        scene.blocks.extend(snapshot.buildings.iter().map(|b| {
            Instance::new(
                Mat4::from_scale_rotation_translation(
                    Vec3::new(b.width, b.height, b.depth),
                    Quat::IDENTITY,
                    b.position,
                ),
                colors::BUILDING,
            )
        }));
        scene.blocks.extend(snapshot.projectiles.iter().map(|p| {
            Instance::new(
                Mat4::from_scale_rotation_translation(
                    Vec3::splat(PROJECTILE_SIZE),
                    Quat::IDENTITY,
                    p.position,
                ),
                colors::PROJECTILE,
            )
        }));

        scene.decals.extend(snapshot.puddles.iter().map(|p| {
            let ground = snapshot.field.height(p.center.x, p.center.y) + PUDDLE_LIFT;
            let diameter = p.radius * 2.0;
            Instance::new(
                Mat4::from_scale_rotation_translation(
                    Vec3::new(diameter, PUDDLE_THICKNESS, diameter),
                    Quat::IDENTITY,
                    Vec3::new(p.center.x, ground, p.center.y),
                ),
                colors::PUDDLE,
            )
            .without_fog()
        }));

        scene
    }

    pub fn len(&self) -> usize {
        self.cars.len() + self.blocks.len() + self.decals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Pursuer, SimulationWorld};

    #[test]
    fn test_box_mesh_shape() {
        let mesh = BoxMesh::car();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        for v in &mesh.vertices {
            assert!(v.position[0].abs() <= 1.0 && v.position[2].abs() <= 2.0);
            assert!((0.0..=1.0).contains(&v.position[1]));
        }
    }

    #[test]
    fn test_scene_counts_follow_world() {
        let mut world = SimulationWorld::new(Settings::default(), 17);
        world.start_round();
        let pursuer = Pursuer::spawn(30.0, 30.0, &world.field, 0.5);
        world.encounters.pursuers.push(pursuer);

        let scene = SceneInstances::from_snapshot(&world.snapshot());
        assert_eq!(scene.cars.len(), 2);
        assert_eq!(scene.blocks.len(), world.buildings.len());
        assert_eq!(scene.decals.len(), 20);
        assert!(scene.decals.iter().all(|d| d.fog == 0.0));
        assert_eq!(scene.cars[0].color, colors::PLAYER);

        // Player instance sits on the car
        let origin = scene.cars[0].matrix().transform_point3(Vec3::ZERO);
        assert!((origin - world.vehicle.position).length() < 1e-5);
    }

    #[test]
    fn test_building_instance_scales_unit_block() {
        let mut world = SimulationWorld::new(Settings::default(), 17);
        world.start_round();
        let building = world.buildings[0];

        let scene = SceneInstances::from_snapshot(&world.snapshot());
        let corner = scene.blocks[0].matrix().transform_point3(Vec3::new(0.5, 1.0, 0.5));
        let expected = building.position + Vec3::new(4.0, 12.0, 4.0);
        assert!((corner - expected).length() < 1e-4);
    }
}
