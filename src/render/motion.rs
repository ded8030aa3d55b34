//! Sub-step interpolation: turns the engine's discrete tile state plus the
//! current step fraction into per-segment pixel positions.
//!
//! Every segment slides toward its chain successor (for the head, the tile
//! it is about to enter). A segment whose travel crosses a grid edge is
//! planned twice with the same offset magnitude: once sliding out past the
//! edge and once sliding in from the opposite edge, a full grid-span away,
//! so the two halves meet at the seam. Planning is pure; nothing here
//! mutates the engine.

use crate::game::GameEngine;

/// One sprite to draw, as the pixel coordinate of its tile's top-left
/// corner (y grows downward, origin at the grid's top-left). Sprites may
/// lie partially or fully outside the pixel bounds while a segment crosses
/// an edge; the canvas clips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub x: i32,
    pub y: i32,
}

/// The food square's pixel position
pub fn food_sprite(engine: &GameEngine) -> Sprite {
    let tile = engine.config().tile_size as i32;
    let food = engine.food_position();
    Sprite {
        x: food.x * tile,
        y: food.y * tile,
    }
}

/// Body sprites in head-to-tail order, including the second half of any
/// segment currently crossing a grid edge. The chain's terminal free tile
/// is not drawn.
pub fn body_sprites(engine: &GameEngine) -> Vec<Sprite> {
    let config = engine.config();
    let tile = config.tile_size as i32;
    let width = config.grid_width as i32;
    let height = config.grid_height as i32;
    let offset = offset_px(engine);

    let mut sprites = Vec::with_capacity(engine.body_length() as usize + 1);

    // the head slides toward the tile it is about to enter
    let mut successor = engine
        .grid()
        .wrap(engine.head_position().moved_in_direction(engine.move_direction()));
    let mut current = engine.head_position();

    for _ in 0..config.cell_count() {
        let Some(behind) = engine.predecessor_of(current) else {
            break;
        };

        let (dx, crosses_x) = axis_travel(current.x, successor.x, width);
        let (dy, crosses_y) = axis_travel(current.y, successor.y, height);

        let sprite = Sprite {
            x: current.x * tile + dx * offset,
            y: current.y * tile + dy * offset,
        };
        sprites.push(sprite);

        if crosses_x {
            sprites.push(Sprite {
                x: sprite.x - dx * width * tile,
                y: sprite.y,
            });
        } else if crosses_y {
            sprites.push(Sprite {
                x: sprite.x,
                y: sprite.y - dy * height * tile,
            });
        }

        successor = current;
        current = behind;
    }

    sprites
}

/// Pixel offset for the current fraction, truncated so a segment never
/// quite reaches its successor tile before the step commits. Zero when
/// fluid motion is disabled.
fn offset_px(engine: &GameEngine) -> i32 {
    let config = engine.config();
    if !config.fluid {
        return 0;
    }
    let tile = config.tile_size as i32;
    ((engine.fraction() * tile as f32) as i32).clamp(0, tile - 1)
}

/// Travel along one axis from a segment's coordinate toward its
/// successor's: (sign, crosses-edge). A difference of `dim - 1` means the
/// segment is taking the short way around the torus.
fn axis_travel(current: i32, successor: i32, dim: i32) -> (i32, bool) {
    let diff = successor - current;
    match diff {
        0 => (0, false),
        1 => (1, false),
        -1 => (-1, false),
        d if d == dim - 1 => (-1, true),
        d if d == -(dim - 1) => (1, true),
        // non-adjacent tiles never sit next to each other in a chain
        d => (d.signum(), false),
    }
}
