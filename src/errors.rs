use thiserror::Error;

/// Result type for all export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can abort a wing export. There is no partial-success mode:
/// the first detected error terminates the whole run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The job names a generator that is not a recognized wing/fin type.
    #[error("no recognized wing generator: '{found}' is not one of WingV2, FinV2")]
    UnrecognizedGenerator {
        /// Generator name found in the job description.
        found: String,
    },

    /// The bundled aircraft template is missing an expected element.
    #[error("aircraft template is missing the <{0}> element")]
    TemplateMissingNode(&'static str),

    /// Root and tip airfoil meshes have different vertex counts, so a
    /// blended profile is undefined.
    #[error("airfoil vertex counts differ: root has {root}, tip has {tip}")]
    ProfileMismatch { root: usize, tip: usize },

    /// The station layout cannot be walked strictly from root to tip.
    #[error("invalid station layout: {0}")]
    BadStationLayout(&'static str),

    /// A guide curve has fewer than two distinct control points.
    #[error("guide curve has fewer than two distinct points")]
    NotEnoughPoints,

    /// A guide curve's total arc length is zero, so fractional positions
    /// along it are undefined.
    #[error("guide curve has zero total length")]
    ZeroLengthCurve,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
