//! Streaming terrain chunks
//!
//! The store keeps every chunk within `render_distance` (Chebyshev, in chunk
//! units) of the player loaded and evicts chunks beyond
//! `render_distance + evict_margin`. The band in between is hysteresis so a
//! player driving along a chunk border does not thrash generation.
//!
//! Chunk geometry is a pure function of its coordinate, so an evicted chunk
//! can always be regenerated bit-for-bit.

use std::collections::HashMap;
use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::noise::NoiseField;
use super::terrain::height_color;
use crate::settings::StreamingSettings;

/// Integer chunk grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world position
    pub fn containing(world_x: f32, world_z: f32, chunk_world_size: f32) -> Self {
        Self {
            x: (world_x / chunk_world_size).floor() as i32,
            z: (world_z / chunk_world_size).floor() as i32,
        }
    }

    /// Chebyshev distance in chunks
    #[inline]
    pub fn distance(&self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// One terrain vertex as uploaded to the GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Triangulated height grid for one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Build the `(chunk_size + 1)²` vertex grid for a chunk
    pub fn build(coord: ChunkCoord, settings: &StreamingSettings, field: &NoiseField) -> Self {
        let size = settings.chunk_size as i32;
        let row = (size + 1) as usize;

        let mut vertices = Vec::with_capacity(row * row);
        for gz in 0..=size {
            for gx in 0..=size {
                let world_x = (coord.x * size + gx) as f32 * settings.tile_size;
                let world_z = (coord.z * size + gz) as f32 * settings.tile_size;
                let height = field.height(world_x, world_z);
                vertices.push(TerrainVertex {
                    position: [world_x, height, world_z],
                    color: height_color(height),
                });
            }
        }

        // Two triangles per cell, same winding everywhere
        let cells = settings.chunk_size as usize;
        let mut indices = Vec::with_capacity(cells * cells * 6);
        for gz in 0..cells {
            for gx in 0..cells {
                let top_left = (gz * row + gx) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((gz + 1) * row + gx) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
            }
        }

        Self { vertices, indices }
    }

    /// Raw vertex bytes for buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for buffer upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Opaque id of geometry uploaded by a [`GeometrySink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u64);

/// Receives chunk geometry when a chunk is generated and is told exactly once
/// when that geometry can be freed.
///
/// A GPU renderer implements this to create and destroy buffers; headless
/// runs use [`HeadlessSink`].
pub trait GeometrySink {
    fn upload(&mut self, coord: ChunkCoord, mesh: &ChunkMesh) -> GeometryHandle;
    fn release(&mut self, coord: ChunkCoord, handle: GeometryHandle);
}

/// Sink that only hands out sequential handles
#[derive(Debug, Default)]
pub struct HeadlessSink {
    next: u64,
    live: usize,
}

impl HeadlessSink {
    /// Handles issued and not yet released
    pub fn live(&self) -> usize {
        self.live
    }
}

impl GeometrySink for HeadlessSink {
    fn upload(&mut self, _coord: ChunkCoord, _mesh: &ChunkMesh) -> GeometryHandle {
        self.next += 1;
        self.live += 1;
        GeometryHandle(self.next)
    }

    fn release(&mut self, _coord: ChunkCoord, _handle: GeometryHandle) {
        self.live -= 1;
    }
}

/// A loaded chunk
#[derive(Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub mesh: ChunkMesh,
    handle: Option<GeometryHandle>,
}

impl Chunk {
    pub fn handle(&self) -> Option<GeometryHandle> {
        self.handle
    }

    fn release(&mut self, sink: &mut dyn GeometrySink) {
        if let Some(handle) = self.handle.take() {
            sink.release(self.coord, handle);
        }
    }
}

/// Chunks created and destroyed by one reconcile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub generated: usize,
    pub evicted: usize,
}

/// Owns every live chunk, keyed by coordinate
pub struct ChunkStore {
    settings: StreamingSettings,
    field: NoiseField,
    chunks: HashMap<ChunkCoord, Chunk>,
    sink: Box<dyn GeometrySink>,
    center: Option<ChunkCoord>,
}

impl fmt::Debug for ChunkStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkStore")
            .field("settings", &self.settings)
            .field("loaded", &self.chunks.len())
            .field("center", &self.center)
            .finish()
    }
}

impl ChunkStore {
    pub fn new(settings: StreamingSettings, field: NoiseField) -> Self {
        Self::with_sink(settings, field, Box::new(HeadlessSink::default()))
    }

    pub fn with_sink(
        settings: StreamingSettings,
        field: NoiseField,
        sink: Box<dyn GeometrySink>,
    ) -> Self {
        debug_assert!(settings.chunk_size > 0 && settings.tile_size > 0.0);
        Self {
            settings,
            field,
            chunks: HashMap::new(),
            sink,
            center: None,
        }
    }

    /// Stream chunks around a player world position
    pub fn reconcile(&mut self, world_x: f32, world_z: f32) -> ReconcileStats {
        let center = ChunkCoord::containing(world_x, world_z, self.settings.chunk_world_size());
        self.center = Some(center);

        let mut stats = ReconcileStats::default();
        let load = self.settings.render_distance;

        for cz in center.z - load..=center.z + load {
            for cx in center.x - load..=center.x + load {
                let coord = ChunkCoord::new(cx, cz);
                if !self.chunks.contains_key(&coord) {
                    let chunk = self.generate(coord);
                    self.chunks.insert(coord, chunk);
                    stats.generated += 1;
                }
            }
        }

        let keep = load + self.settings.evict_margin;
        let mut stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| coord.distance(center) > keep)
            .copied()
            .collect();
        stale.sort_unstable();

        for coord in stale {
            if let Some(mut chunk) = self.chunks.remove(&coord) {
                chunk.release(self.sink.as_mut());
                stats.evicted += 1;
            }
        }

        if stats.generated > 0 || stats.evicted > 0 {
            log::debug!(
                "Chunks around ({}, {}): +{} -{} ({} loaded)",
                center.x,
                center.z,
                stats.generated,
                stats.evicted,
                self.chunks.len()
            );
        }

        stats
    }

    fn generate(&mut self, coord: ChunkCoord) -> Chunk {
        let mesh = ChunkMesh::build(coord, &self.settings, &self.field);
        let handle = self.sink.upload(coord, &mesh);
        Chunk {
            coord,
            mesh,
            handle: Some(handle),
        }
    }

    /// Release every chunk
    pub fn clear(&mut self) {
        for (_, mut chunk) in self.chunks.drain() {
            chunk.release(self.sink.as_mut());
        }
        self.center = None;
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk the player was in at the last reconcile
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    pub fn settings(&self) -> &StreamingSettings {
        &self.settings
    }
}

impl Drop for ChunkStore {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum SinkCall {
        Upload(ChunkCoord, GeometryHandle),
        Release(ChunkCoord, GeometryHandle),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Rc<RefCell<Vec<SinkCall>>>,
        next: u64,
    }

    impl GeometrySink for RecordingSink {
        fn upload(&mut self, coord: ChunkCoord, _mesh: &ChunkMesh) -> GeometryHandle {
            self.next += 1;
            let handle = GeometryHandle(self.next);
            self.calls.borrow_mut().push(SinkCall::Upload(coord, handle));
            handle
        }

        fn release(&mut self, coord: ChunkCoord, handle: GeometryHandle) {
            self.calls.borrow_mut().push(SinkCall::Release(coord, handle));
        }
    }

    fn small_settings() -> StreamingSettings {
        StreamingSettings {
            chunk_size: 4,
            tile_size: 2.0,
            render_distance: 1,
            evict_margin: 2,
        }
    }

    fn recording_store() -> (ChunkStore, Rc<RefCell<Vec<SinkCall>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = RecordingSink {
            calls: calls.clone(),
            next: 0,
        };
        let store = ChunkStore::with_sink(small_settings(), NoiseField::default(), Box::new(sink));
        (store, calls)
    }

    #[test]
    fn test_containing_uses_floor() {
        assert_eq!(ChunkCoord::containing(0.0, 0.0, 64.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(63.9, 64.0, 64.0), ChunkCoord::new(0, 1));
        assert_eq!(ChunkCoord::containing(-0.1, -64.1, 64.0), ChunkCoord::new(-1, -2));
    }

    #[test]
    fn test_mesh_layout() {
        let settings = small_settings();
        let mesh = ChunkMesh::build(ChunkCoord::new(-2, 3), &settings, &NoiseField::default());
        assert_eq!(mesh.vertices.len(), 25);
        assert_eq!(mesh.indices.len(), 4 * 4 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));

        // First vertex sits on the chunk's world-space corner
        assert_eq!(mesh.vertices[0].position[0], -16.0);
        assert_eq!(mesh.vertices[0].position[2], 24.0);
        // First cell: (tl, bl, tr), (tr, bl, br)
        assert_eq!(&mesh.indices[..6], &[0, 5, 1, 1, 5, 6]);
        assert_eq!(mesh.vertex_bytes().len(), 25 * 24);
    }

    #[test]
    fn test_neighbor_chunks_share_edges() {
        let settings = small_settings();
        let field = NoiseField::default();
        let left = ChunkMesh::build(ChunkCoord::new(0, 0), &settings, &field);
        let right = ChunkMesh::build(ChunkCoord::new(1, 0), &settings, &field);
        for row in 0..5 {
            assert_eq!(left.vertices[row * 5 + 4], right.vertices[row * 5]);
        }
    }

    #[test]
    fn test_reconcile_loads_square_and_is_idempotent() {
        let (mut store, calls) = recording_store();

        let first = store.reconcile(1.0, 1.0);
        assert_eq!(first, ReconcileStats { generated: 9, evicted: 0 });
        assert_eq!(store.len(), 9);
        assert_eq!(store.center(), Some(ChunkCoord::new(0, 0)));

        let count = calls.borrow().len();
        let second = store.reconcile(1.0, 1.0);
        assert_eq!(second, ReconcileStats::default());
        assert_eq!(calls.borrow().len(), count);
    }

    #[test]
    fn test_hysteresis_band_keeps_chunks() {
        let (mut store, _calls) = recording_store();
        store.reconcile(0.0, 0.0);

        // Move two chunks east: old column x=-1 is at distance 3, within 1 + 2
        let stats = store.reconcile(2.0 * 8.0 + 1.0, 0.0);
        assert_eq!(stats.evicted, 0);
        assert!(store.contains(ChunkCoord::new(-1, 0)));

        // Three chunks east: x=-1 is at distance 4, one past the band
        let stats = store.reconcile(3.0 * 8.0 + 1.0, 0.0);
        assert!(stats.evicted > 0);
        assert!(!store.contains(ChunkCoord::new(-1, 0)));
        assert!(store.contains(ChunkCoord::new(0, 0)));

        // Four chunks east: x=0 is at distance 4 and goes
        let stats = store.reconcile(4.0 * 8.0 + 1.0, 0.0);
        assert!(stats.evicted > 0);
        assert!(!store.contains(ChunkCoord::new(0, 0)));
        assert!(store.iter().all(|c| c.coord.distance(ChunkCoord::new(4, 0)) <= 3));
    }

    #[test]
    fn test_release_exactly_once_per_upload() {
        let (mut store, calls) = recording_store();
        store.reconcile(0.0, 0.0);
        store.reconcile(400.0, -400.0);
        store.reconcile(0.0, 0.0);
        drop(store);

        let calls = calls.borrow();
        let uploads: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Upload(coord, h) => Some((*coord, *h)),
                _ => None,
            })
            .collect();
        let mut releases: Vec<_> = calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Release(coord, h) => Some((*coord, *h)),
                _ => None,
            })
            .collect();
        assert_eq!(uploads.len(), releases.len());
        releases.sort_by_key(|(_, h)| h.0);
        let mut expected = uploads.clone();
        expected.sort_by_key(|(_, h)| h.0);
        assert_eq!(releases, expected);
    }

    #[test]
    fn test_regenerated_chunk_is_identical() {
        let (mut store, _calls) = recording_store();
        store.reconcile(0.0, 0.0);
        let original = store
            .get(ChunkCoord::new(0, 0))
            .map(|c| c.mesh.clone())
            .expect("loaded");

        store.reconcile(1000.0, 1000.0);
        assert!(!store.contains(ChunkCoord::new(0, 0)));

        store.reconcile(0.0, 0.0);
        let regenerated = store.get(ChunkCoord::new(0, 0)).expect("reloaded");
        assert_eq!(regenerated.mesh, original);
    }

    #[test]
    fn test_headless_sink_tracks_live_handles() {
        let mut sink = HeadlessSink::default();
        let mesh = ChunkMesh::build(ChunkCoord::new(0, 0), &small_settings(), &NoiseField::default());
        let a = sink.upload(ChunkCoord::new(0, 0), &mesh);
        let b = sink.upload(ChunkCoord::new(1, 0), &mesh);
        assert_ne!(a, b);
        sink.release(ChunkCoord::new(0, 0), a);
        assert_eq!(sink.live(), 1);
    }
}
