/// Pipeline fault taxonomy.
///
/// Every fault surfaces to the supervisor in the firmware entry point; no
/// component keeps running after detecting a broken invariant of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The ADC exchange did not complete within its deadline. Fatal: the
    /// output is halted to silence rather than left replaying a stale
    /// sample.
    #[error("ADC exchange deadline exceeded")]
    PeripheralFault,
    /// The processing core did not return a sample within one period.
    /// Recoverable: the last output is repeated and the miss is counted.
    #[error("processing core missed a sample period")]
    PipelineStarvation,
    /// Startup timing parameters are inconsistent. Fatal before any output
    /// is enabled.
    #[error("invalid timing configuration: {0}")]
    Configuration(&'static str),
}
