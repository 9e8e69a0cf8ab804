use alsmix_types::UnitError;

/// Failures reading or writing a project container. These are fatal for the
/// whole run; nothing is written when one occurs.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a gzip-compressed project file")]
    NotGzip,

    #[error("project content is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("malformed project XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed project XML: {0}")]
    Structure(String),

    #[error("missing required element '{path}'")]
    MissingElement { path: String },
}

/// A single change request that could not be applied. The document is left
/// untouched by the failing request; the rest of the batch continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChangeError {
    #[error("Could not find track '{name}'")]
    TrackNotFound { name: String },

    #[error("Could not find return track '{name}'")]
    ReturnNotFound { name: String },

    #[error("Track '{name}' index {index} out of range (found {found})")]
    TrackIndexOutOfRange {
        name: String,
        index: usize,
        found: usize,
    },

    #[error("Could not find Main/Master track")]
    MasterBusNotFound,

    #[error("No mixer found on track '{track}'")]
    MixerNotFound { track: String },

    #[error("Could not find device '{tag}' on track '{track}'")]
    DeviceNotFound { tag: String, track: String },

    #[error("Could not set {param} on {tag} for track '{track}'")]
    ParameterNotFound {
        param: String,
        tag: String,
        track: String,
    },

    #[error("No existing '{tag}' found in project to use as template")]
    NoDonorAvailable { tag: String },

    #[error("Could not set param '{param}' on new {tag} for '{track}'")]
    NewDeviceParameterNotFound {
        param: String,
        tag: String,
        track: String,
    },

    #[error("No device chain found on track '{track}'")]
    NoDeviceChain { track: String },

    #[error("{0}")]
    InvalidFormat(#[from] UnitError),
}

/// Failures loading a change batch document.
#[derive(Debug, thiserror::Error)]
pub enum ChangeBatchError {
    #[error("could not read change batch: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid change batch: {0}")]
    Json(#[from] serde_json::Error),
}
