pub mod error;
pub mod http;
pub mod page;
pub mod pipeline;
pub mod response;
pub mod transport;

pub use error::{DeliveryError, Result};
pub use page::Page;
pub use pipeline::{
    DeliveryFailure, PipelineSettings, Submission, SubmissionController, SubmissionOutcome,
    SubmissionReport, SubmissionState, BUSY_LABEL,
};
pub use transport::{Beacon, Transport, TransportResponse};
