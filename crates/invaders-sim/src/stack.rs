//! Stack links between ships and the join/destroy resolution rules.
//!
//! A stack is a root ship plus an ordered list of children. Only the root's
//! link carries a meaningful multiplier and child list; children only point
//! back at their root. Stored as an ECS component because it references
//! other entities.

use hecs::{ComponentError, Entity, World};

use invaders_core::components::Ship;
use invaders_core::constants::BASE_MULTIPLIER;
use invaders_core::error::SimError;
use invaders_core::types::Position;

/// Stack membership of a ship.
#[derive(Debug, Clone)]
pub struct StackLink {
    /// Root of the stack, or `None` when this ship is the root.
    pub parent: Option<Entity>,
    /// Children in join order (roots only). The first child is promoted
    /// when the root is destroyed.
    pub children: Vec<Entity>,
    /// Task multiplier (roots only).
    pub multiplier: f64,
}

impl Default for StackLink {
    fn default() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            multiplier: BASE_MULTIPLIER,
        }
    }
}

/// What destroying a ship did to its stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DestroyOutcome {
    /// A child left its stack; the root's multiplier dropped by one step.
    ChildRemoved { parent: Entity },
    /// The root died and its first child took over the stack.
    RootPromoted { old_root: Entity, new_root: Entity },
    /// The root died alone; the stack no longer exists.
    StackCleared { old_root: Entity },
}

/// Result of [`destroy`]: the ship that died plus the stack change.
#[derive(Debug, Clone, Copy)]
pub struct Destruction {
    pub ship: Ship,
    pub position: Position,
    pub outcome: DestroyOutcome,
}

pub(crate) fn entity_id(entity: Entity) -> u64 {
    entity.to_bits().get()
}

pub(crate) fn component_error(entity: Entity, err: ComponentError) -> SimError {
    match err {
        ComponentError::NoSuchEntity => SimError::StaleEntity(entity_id(entity)),
        ComponentError::MissingComponent(_) => SimError::NotInStack(entity_id(entity)),
    }
}

fn ship_number(world: &World, entity: Entity) -> Result<u32, SimError> {
    world
        .get::<&Ship>(entity)
        .map(|ship| ship.ship_number)
        .map_err(|e| component_error(entity, e))
}

/// Number of ships in the stack rooted at `root`, root included.
pub fn stack_size(world: &World, root: Entity) -> Result<usize, SimError> {
    world
        .get::<&StackLink>(root)
        .map(|link| link.children.len() + 1)
        .map_err(|e| component_error(root, e))
}

/// Whether `entity` is currently a stack root.
pub fn is_root(world: &World, entity: Entity) -> Result<bool, SimError> {
    world
        .get::<&StackLink>(entity)
        .map(|link| link.parent.is_none())
        .map_err(|e| component_error(entity, e))
}

/// Attach `child` to the stack rooted at `parent`.
///
/// The parent's multiplier grows by `step` and the child is nudged `offset`
/// away from the parent along the local right (even slots) or up (odd
/// slots) tangent, staying on the parent's sphere.
pub fn join(
    world: &mut World,
    child: Entity,
    parent: Entity,
    step: f64,
    offset: f64,
) -> Result<(), SimError> {
    if !is_root(world, parent)? || child == parent {
        return Err(SimError::ParentNotRoot {
            child: ship_number(world, child)?,
            parent: ship_number(world, parent)?,
        });
    }
    // Validate the child before touching the parent.
    stack_size(world, child)?;

    let parent_pos = *world
        .get::<&Position>(parent)
        .map_err(|e| component_error(parent, e))?;

    let slot = {
        let mut link = world
            .get::<&mut StackLink>(parent)
            .map_err(|e| component_error(parent, e))?;
        let slot = link.children.len();
        link.children.push(child);
        link.multiplier += step;
        slot
    };

    {
        let mut link = world
            .get::<&mut StackLink>(child)
            .map_err(|e| component_error(child, e))?;
        link.parent = Some(parent);
        link.children.clear();
        link.multiplier = BASE_MULTIPLIER;
    }

    if let Ok(mut pos) = world.get::<&mut Position>(child) {
        *pos = offset_position(&parent_pos, slot, offset);
    }
    Ok(())
}

/// Position of the ship occupying `slot` in a stack whose root sits at `root`.
pub fn offset_position(root: &Position, slot: usize, offset: f64) -> Position {
    let (right, up) = root.tangent_basis();
    let dir = if slot % 2 == 0 { right } else { up };
    let radius = root.length();
    let moved = root.as_dvec3() + dir * offset;
    if radius == 0.0 {
        return Position::from_dvec3(moved);
    }
    Position::from_dvec3(moved.normalize() * radius)
}

/// Remove `entity` from its stack and despawn it.
///
/// - root with children: the first child becomes root, inheriting the
///   remaining children and the old multiplier minus `step`.
/// - root without children: the stack is gone.
/// - child: removed from the root's list; the root loses `step`.
///
/// Roster bookkeeping, the destroyed counter and pickups are the caller's
/// job, driven by the returned [`DestroyOutcome`].
pub fn destroy(world: &mut World, entity: Entity, step: f64) -> Result<Destruction, SimError> {
    let ship = *world
        .get::<&Ship>(entity)
        .map_err(|e| component_error(entity, e))?;
    let position = world
        .get::<&Position>(entity)
        .map(|p| *p)
        .unwrap_or_default();
    let (parent, children, multiplier) = {
        let link = world
            .get::<&StackLink>(entity)
            .map_err(|e| component_error(entity, e))?;
        (link.parent, link.children.clone(), link.multiplier)
    };

    let outcome = match parent {
        Some(parent) => {
            let mut link = world
                .get::<&mut StackLink>(parent)
                .map_err(|e| component_error(parent, e))?;
            link.children.retain(|&c| c != entity);
            link.multiplier -= step;
            DestroyOutcome::ChildRemoved { parent }
        }
        None => match children.split_first() {
            Some((&new_root, rest)) => {
                {
                    let mut link = world
                        .get::<&mut StackLink>(new_root)
                        .map_err(|e| component_error(new_root, e))?;
                    link.parent = None;
                    link.children = rest.to_vec();
                    link.multiplier = multiplier - step;
                }
                for &sibling in rest {
                    let mut link = world
                        .get::<&mut StackLink>(sibling)
                        .map_err(|e| component_error(sibling, e))?;
                    link.parent = Some(new_root);
                }
                DestroyOutcome::RootPromoted {
                    old_root: entity,
                    new_root,
                }
            }
            None => DestroyOutcome::StackCleared { old_root: entity },
        },
    };

    world
        .despawn(entity)
        .map_err(|_| SimError::StaleEntity(entity_id(entity)))?;

    Ok(Destruction {
        ship,
        position,
        outcome,
    })
}
