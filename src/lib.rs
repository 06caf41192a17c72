//=========================================================================
// Strata Engine - Library Root
//
// Runtime core of a 2D game engine: entity registries, grid collision,
// movement integration and a stack of transitioning screens.
//
// Responsibilities:
// - Expose the frame-stepped engine facade (`Engine`)
// - Expose the core subsystems for hosts that drive them directly
// - Ship generic menu and message box screens
//
// Typical usage:
// ```no_run
// use strata_engine::EngineBuilder;
// use strata_engine::core::render::CommandList;
//
// let mut engine = EngineBuilder::new().build();
// let mut target = CommandList::new();
// while !engine.is_finished() {
//     engine.frame(&mut target);
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every subsystem. `screens` holds ready-made screen logic
// built on top of it.
//
pub mod core;
pub mod prelude;
pub mod screens;

//--- Internal Modules ----------------------------------------------------
//
// `engine` wires the clock, input channel and screen stack together.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
