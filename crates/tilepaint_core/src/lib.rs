//! Core data structures for tilepaint
//!
//! This crate provides the types the editing engine works on:
//! - `Region` - Sets of cell rectangles with union, subtraction and intersection
//! - `Cell` / `TileGrid` - Tile references and the grids that hold them
//! - `Map` / `Layer` - Tile and object layers, tilesets and properties
//! - `MapDocument` - A map open for editing, with change notifications
//! - `TilePainter` - The single path for writing cells into live layers

mod cell;
mod document;
mod grid;
mod layer;
mod map;
mod object;
mod painter;
mod region;
mod tileset;
mod value;

pub use cell::{Cell, TILE_FLIP_DIAGONAL, TILE_FLIP_X, TILE_FLIP_Y, TILE_INDEX_MASK};
pub use document::{MapChange, MapDocument};
pub use grid::TileGrid;
pub use layer::{Layer, LayerData, LayerId, LayerType};
pub use map::Map;
pub use object::MapObject;
pub use painter::TilePainter;
pub use region::{Rect, Region};
pub use tileset::Tileset;
pub use value::{Properties, PropertyValue};
