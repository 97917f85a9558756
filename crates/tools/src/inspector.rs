use tilecast_common::TileCoord;
use tilecast_kernel::{World, WorldEvent};
use tilecast_render::{Slice, frame_hash};

/// Read-only queries over a world and the frame cast from it, for debugging
/// and developer UI.
pub struct FrameInspector;

impl FrameInspector {
    /// Produce a summary of the world state and one frame.
    pub fn summary(world: &World, slices: &[Slice]) -> FrameSummary {
        let pose = world.pose();
        let hits: Vec<f32> = slices
            .iter()
            .filter_map(|s| s.hit.map(|h| h.corrected_depth))
            .collect();
        let blocked_moves = world
            .events()
            .iter()
            .filter(|e| matches!(e, WorldEvent::Blocked { .. }))
            .count();
        tracing::trace!(tick = world.tick(), rays = slices.len(), hits = hits.len(), "frame summary");
        FrameSummary {
            tick: world.tick(),
            position: [pose.position.x, pose.position.y],
            heading_degrees: pose.heading.to_degrees(),
            tile: world.grid().tile_of(pose.position),
            pending_events: world.events().len(),
            blocked_moves,
            rays: slices.len(),
            hits: hits.len(),
            nearest: hits.iter().copied().reduce(f32::min),
            farthest: hits.iter().copied().reduce(f32::max),
            frame_hash: frame_hash(slices),
        }
    }

    /// Details of ray `column`, if the frame has it.
    pub fn inspect_ray(slices: &[Slice], column: u32) -> Option<RayInfo> {
        slices.get(column as usize).map(|s| RayInfo {
            column: s.column,
            band: (s.x_start, s.x_end),
            height: s.height,
            depth: s.depth,
            tile: s.hit.map(|h| h.tile),
        })
    }
}

/// Summary of world and frame state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub tick: u64,
    pub position: [f32; 2],
    pub heading_degrees: f32,
    pub tile: TileCoord,
    pub pending_events: usize,
    pub blocked_moves: usize,
    pub rays: usize,
    pub hits: usize,
    /// Smallest corrected depth among hits.
    pub nearest: Option<f32>,
    pub farthest: Option<f32>,
    pub frame_hash: u64,
}

impl FrameSummary {
    pub fn misses(&self) -> usize {
        self.rays - self.hits
    }
}

impl std::fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Frame: tick={} pos=({:.2}, {:.2}) heading={:.1}deg tile={} rays={} hits={} misses={}",
            self.tick,
            self.position[0],
            self.position[1],
            self.heading_degrees,
            self.tile,
            self.rays,
            self.hits,
            self.misses(),
        )?;
        if let (Some(near), Some(far)) = (self.nearest, self.farthest) {
            write!(f, " depth=[{near:.1}, {far:.1}]")?;
        }
        write!(
            f,
            " blocked={} events={} hash={:016x}",
            self.blocked_moves, self.pending_events, self.frame_hash
        )
    }
}

/// One ray's slice, flattened for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RayInfo {
    pub column: u32,
    pub band: (u32, u32),
    pub height: f32,
    pub depth: f32,
    pub tile: Option<TileCoord>,
}

impl std::fmt::Display for RayInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ray {} x=[{}, {}) height={:.1} depth={:.1}",
            self.column, self.band.0, self.band.1, self.height, self.depth
        )?;
        match self.tile {
            Some(tile) => write!(f, " hit={tile}"),
            None => write!(f, " miss"),
        }
    }
}
