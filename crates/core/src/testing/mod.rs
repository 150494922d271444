//! Testing utilities and mock implementations for pipeline tests.
//!
//! Mock implementations of the Provider and Assembler traits let the
//! orchestrator be exercised end-to-end without a real archive endpoint
//! or an ffmpeg binary.

mod mock_provider;
mod stub_assembler;

pub use mock_provider::MockProvider;
pub use stub_assembler::StubAssembler;
