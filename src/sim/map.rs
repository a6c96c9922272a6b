//! Tile map, obstacles and spawn cache
//!
//! The grid is centred on the world origin: tile `(tx, ty)` covers the unit
//! square whose centre is `(tx - W/2 + 0.5, ty - H/2 + 0.5)`.
//!
//! Grid, obstacles and spawn points always come from the same load. A load
//! is split into `begin_load` / `prepare` / `commit` so a driver that fetches
//! asynchronously can run them apart; `commit` only accepts the most recently
//! issued ticket.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{MAP_HEIGHT, MAP_WIDTH, OBSTACLE_VARIANTS};
use crate::error::LoadError;
use crate::maps::MapSource;
use crate::tuning::Tuning;

/// Terrain of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    /// Impassable liquid
    Water = 0,
    /// Open ground
    Ground = 1,
    /// Open ground with a decorative overlay
    Decorated = 2,
    /// Ground hosting an obstacle
    Obstacle = 3,
}

impl Tile {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tile::Water),
            1 => Some(Tile::Ground),
            2 => Some(Tile::Decorated),
            3 => Some(Tile::Obstacle),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_passable(self) -> bool {
        !matches!(self, Tile::Water)
    }
}

/// On-disk shape of a map definition
#[derive(Debug, Deserialize)]
struct MapDefinition {
    map: Vec<Vec<u8>>,
}

/// Fixed-size grid of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Empty 0x0 grid; nothing is occupiable
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            tiles: Vec::new(),
        }
    }

    /// Build a grid from rows of tile codes (row 0 is the top)
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, LoadError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(LoadError::Shape {
                    expected: (width, height),
                    found: (row.len(), height),
                });
            }
            for (x, &code) in row.iter().enumerate() {
                let tile = Tile::from_code(code).ok_or(LoadError::InvalidTile { x, y, code })?;
                tiles.push(tile);
            }
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Parse a map definition, which must be exactly `MAP_WIDTH` x `MAP_HEIGHT`
    pub fn parse(index: usize, json: &str) -> Result<Self, LoadError> {
        let def: MapDefinition =
            serde_json::from_str(json).map_err(|source| LoadError::Parse { index, source })?;
        let grid = Self::from_rows(&def.map)?;
        if grid.width != MAP_WIDTH || grid.height != MAP_HEIGHT {
            return Err(LoadError::Shape {
                expected: (MAP_WIDTH, MAP_HEIGHT),
                found: (grid.width, grid.height),
            });
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at grid index, `None` when out of bounds
    pub fn get(&self, tx: i64, ty: i64) -> Option<Tile> {
        if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
            return None;
        }
        Some(self.tiles[ty as usize * self.width + tx as usize])
    }

    /// World-space centre of a tile
    pub fn tile_center(&self, tx: usize, ty: usize) -> Vec2 {
        Vec2::new(
            tx as f32 - self.width as f32 / 2.0 + 0.5,
            ty as f32 - self.height as f32 / 2.0 + 0.5,
        )
    }

    /// Grid index containing a world-space coordinate
    fn tile_index(&self, x: f32, y: f32) -> (i64, i64) {
        (
            (x + self.width as f32 / 2.0).floor() as i64,
            (y + self.height as f32 / 2.0).floor() as i64,
        )
    }

    /// All tiles with their grid indices, row-major
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, &t)| (i % self.width.max(1), i / self.width.max(1), t))
    }
}

/// Axis-aligned blocker centred on a tile coded 3
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    /// Sprite variant for the renderer
    pub variant: u8,
}

/// Extents used by the containment queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRules {
    /// Obstacle half-extent for bullets
    pub obstacle_half: f32,
    /// Obstacle half-extent for bodies, before adding the body radius
    pub obstacle_collision_half: f32,
    /// Body radius the spawn cache is computed for
    pub spawn_radius: f32,
}

impl From<&Tuning> for CollisionRules {
    fn from(t: &Tuning) -> Self {
        Self {
            obstacle_half: t.obstacle_half,
            obstacle_collision_half: t.obstacle_collision_half,
            spawn_radius: t.collision_radius,
        }
    }
}

impl Default for CollisionRules {
    fn default() -> Self {
        Self::from(&Tuning::default())
    }
}

/// Grid and the obstacles derived from it
#[derive(Debug, Clone)]
struct Layout {
    grid: TileGrid,
    obstacles: Vec<Obstacle>,
}

impl Layout {
    fn derive<R: Rng + ?Sized>(grid: TileGrid, rng: &mut R) -> Self {
        let obstacles = grid
            .iter()
            .filter(|&(_, _, t)| t == Tile::Obstacle)
            .map(|(tx, ty, _)| Obstacle {
                pos: grid.tile_center(tx, ty),
                variant: rng.random_range(0..OBSTACLE_VARIANTS),
            })
            .collect();
        Self { grid, obstacles }
    }

    fn can_occupy(&self, rules: &CollisionRules, x: f32, y: f32, radius: f32) -> bool {
        let (x0, y0) = self.grid.tile_index(x - radius, y - radius);
        let (x1, y1) = self.grid.tile_index(x + radius, y + radius);

        for ty in y0..=y1 {
            for tx in x0..=x1 {
                match self.grid.get(tx, ty) {
                    Some(tile) if tile.is_passable() => {}
                    _ => return false,
                }
            }
        }

        let hs = rules.obstacle_collision_half + radius;
        !self
            .obstacles
            .iter()
            .any(|o| (x - o.pos.x).abs() < hs && (y - o.pos.y).abs() < hs)
    }

    fn blocks_at(&self, rules: &CollisionRules, x: f32, y: f32) -> bool {
        let h = rules.obstacle_half;
        self.obstacles
            .iter()
            .any(|o| (x - o.pos.x).abs() < h && (y - o.pos.y).abs() < h)
    }

    fn spawn_points(&self, rules: &CollisionRules) -> Vec<Vec2> {
        self.grid
            .iter()
            .map(|(tx, ty, _)| self.grid.tile_center(tx, ty))
            .filter(|p| self.can_occupy(rules, p.x, p.y, rules.spawn_radius))
            .collect()
    }
}

/// A fully derived map, ready to be committed in one step
#[derive(Debug, Clone)]
pub struct PreparedMap {
    index: Option<usize>,
    layout: Layout,
    spawn_points: Vec<Vec2>,
}

impl PreparedMap {
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

/// Handle for one in-flight load; only the newest may commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// The loaded map and everything derived from it
#[derive(Debug, Clone)]
pub struct TileMap {
    rules: CollisionRules,
    index: Option<usize>,
    layout: Layout,
    spawn_points: Vec<Vec2>,
    /// Last ticket handed out
    issued: u64,
}

impl TileMap {
    /// A map with an empty grid (nothing occupiable, no spawn points)
    pub fn new(rules: CollisionRules) -> Self {
        Self {
            rules,
            index: None,
            layout: Layout {
                grid: TileGrid::empty(),
                obstacles: Vec::new(),
            },
            spawn_points: Vec::new(),
            issued: 0,
        }
    }

    /// Build directly from a grid (no source, no index)
    pub fn from_grid<R: Rng + ?Sized>(rules: CollisionRules, grid: TileGrid, rng: &mut R) -> Self {
        let mut map = Self::new(rules);
        let prepared = map.prepare_grid(None, grid, rng);
        let ticket = map.begin_load();
        map.commit(ticket, prepared);
        map
    }

    /// Derive obstacles and spawn cache for a grid without touching `self`
    pub fn prepare_grid<R: Rng + ?Sized>(
        &self,
        index: Option<usize>,
        grid: TileGrid,
        rng: &mut R,
    ) -> PreparedMap {
        let layout = Layout::derive(grid, rng);
        let spawn_points = layout.spawn_points(&self.rules);
        PreparedMap {
            index,
            layout,
            spawn_points,
        }
    }

    /// Fetch, parse and derive map `index` without touching `self`
    pub fn prepare<R: Rng + ?Sized>(
        &self,
        source: &dyn MapSource,
        index: usize,
        rng: &mut R,
    ) -> Result<PreparedMap, LoadError> {
        if index >= source.pool_size() {
            return Err(LoadError::UnknownMap {
                index,
                pool: source.pool_size(),
            });
        }
        let json = source.fetch(index)?;
        let grid = TileGrid::parse(index, &json)?;
        Ok(self.prepare_grid(Some(index), grid, rng))
    }

    /// Start a load; any earlier ticket becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket {
            generation: self.issued,
        }
    }

    /// Install a prepared map if `ticket` is still the newest.
    /// Returns false (and changes nothing) for a stale ticket.
    pub fn commit(&mut self, ticket: LoadTicket, prepared: PreparedMap) -> bool {
        if ticket.generation != self.issued {
            log::warn!(
                "Discarding stale map load (ticket {}, newest {})",
                ticket.generation,
                self.issued
            );
            return false;
        }
        self.index = prepared.index;
        self.layout = prepared.layout;
        self.spawn_points = prepared.spawn_points;
        log::info!(
            "Map {:?} loaded: {} obstacles, {} spawn points",
            self.index,
            self.layout.obstacles.len(),
            self.spawn_points.len()
        );
        true
    }

    /// Load map `index`, or a uniformly random one from the pool.
    /// On error the current map is left untouched.
    pub fn load<R: Rng + ?Sized>(
        &mut self,
        source: &dyn MapSource,
        index: Option<usize>,
        rng: &mut R,
    ) -> Result<usize, LoadError> {
        let index = match index {
            Some(i) => i,
            None => rng.random_range(0..source.pool_size().max(1)),
        };
        let ticket = self.begin_load();
        let prepared = self.prepare(source, index, rng)?;
        self.commit(ticket, prepared);
        Ok(index)
    }

    /// Whether a disc of `radius` at (x, y) lies over passable tiles and
    /// clear of every obstacle's expanded square
    pub fn can_occupy(&self, x: f32, y: f32, radius: f32) -> bool {
        self.layout.can_occupy(&self.rules, x, y, radius)
    }

    /// Whether a point is inside an obstacle's (bullet-sized) square
    pub fn blocks_at(&self, x: f32, y: f32) -> bool {
        self.layout.blocks_at(&self.rules, x, y)
    }

    /// Uniform pick from the spawn cache, or the origin if it is empty
    pub fn random_spawn_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        if self.spawn_points.is_empty() {
            return Vec2::ZERO;
        }
        self.spawn_points[rng.random_range(0..self.spawn_points.len())]
    }

    /// Cached spawn point farthest from `from` (origin if the cache is empty)
    pub fn farthest_spawn_point(&self, from: Vec2) -> Vec2 {
        self.spawn_points
            .iter()
            .copied()
            .max_by(|a, b| {
                a.distance_squared(from)
                    .partial_cmp(&b.distance_squared(from))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(Vec2::ZERO)
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn grid(&self) -> &TileGrid {
        &self.layout.grid
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.layout.obstacles
    }

    pub fn spawn_points(&self) -> &[Vec2] {
        &self.spawn_points
    }

    pub fn rules(&self) -> &CollisionRules {
        &self.rules
    }
}
