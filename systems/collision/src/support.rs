use superfco_core::{CollisionModel, Position, Support};

/// Standing on a floor, or clinging to a side wall away from the map edge.
#[must_use]
pub fn has_support(model: &CollisionModel, position: Position) -> bool {
    if position.y == model.bottom {
        return true;
    }
    if model.is_map_border {
        return false;
    }
    position.x == model.right || position.x == model.left
}

/// Airborne within the vertical play space and not propped up by a corner.
#[must_use]
pub fn is_floating(model: &CollisionModel, position: Position) -> bool {
    if has_support(model, position) || model.is_terrain_corner {
        return false;
    }
    position.y < model.bottom && position.y >= model.top
}

/// Floor or corner contact; the permission to walk and to jump.
#[must_use]
pub fn has_footing(model: &CollisionModel, position: Position) -> bool {
    model.is_terrain_corner || position.y == model.bottom
}

/// Evaluates every support predicate for `position` against one probe result.
///
/// The model must come from a probe taken at this same position; mixing a
/// stale probe with a fresh position makes entities jitter along boundaries.
#[must_use]
pub fn classify(model: &CollisionModel, position: Position) -> Support {
    Support {
        has_support: has_support(model, position),
        is_floating: is_floating(model, position),
        has_footing: has_footing(model, position),
        on_floor: position.y == model.bottom,
        against_left: position.x == model.left,
        against_right: position.x == model.right,
        on_map_border: model.is_map_border,
        in_water: model.is_water,
    }
}
