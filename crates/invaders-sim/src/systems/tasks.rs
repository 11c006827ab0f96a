//! Ship task system: advances every ship's task timer and collects the
//! output of the stack roots whose timers fired.

use hecs::World;

use invaders_core::components::{Ship, TaskTimer};
use invaders_core::config::GameConfig;
use invaders_core::enums::TaskKind;

use crate::stack::StackLink;

/// Output of one root's task firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskEffect {
    pub ship_number: u32,
    pub kind: TaskKind,
    /// `base × multiplier` for the ship's kind.
    pub amount: f64,
}

/// Tick all task timers. Children keep their timers running so a promoted
/// child keeps its phase, but only roots produce effects.
pub fn run(world: &mut World, config: &GameConfig, effects: &mut Vec<TaskEffect>) {
    for (_entity, (ship, link, timer)) in
        world.query_mut::<(&Ship, &StackLink, &mut TaskTimer)>()
    {
        if timer.remaining_ticks > 1 {
            timer.remaining_ticks -= 1;
            continue;
        }
        timer.remaining_ticks = timer.period_ticks;

        if link.parent.is_some() {
            continue;
        }
        let kind = ship.kind.task();
        let base = match kind {
            TaskKind::Damage => config.destroyer_base_damage,
            TaskKind::Mine => config.miner_base_output,
        };
        effects.push(TaskEffect {
            ship_number: ship.ship_number,
            kind,
            amount: base * link.multiplier,
        });
    }
}
