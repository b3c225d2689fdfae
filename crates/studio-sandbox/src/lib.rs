//! # Studio Sandbox
//!
//! Stand-ins for the Juvix toolchain: a compiler that returns canned Nockma
//! and a simulator that answers from fixed tables.

pub mod compiler;
pub mod simulator;

pub use compiler::{
    artifact_filename, compile_source, default_source, export_nockma, CompileResult, Compiler,
    CompilerConfig,
};
pub use simulator::{
    contract_functions, ContractFamily, ContractFunction, FunctionParameter, SimulationResult,
    Simulator, SimulatorConfig,
};
