// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Cutting a recorded note into its attack and a single loopable cycle.

pub mod attack;
pub mod crossings;
pub mod cycle;

pub use attack::extract_attack;
pub use crossings::find_crossings;
pub use cycle::{
    select_loop_cycle, select_loop_cycle_with, CycleOrigin, CycleSearch, CycleSelection,
    LoopCycle,
};
