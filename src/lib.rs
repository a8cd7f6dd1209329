//! Research facades over market, social and weather APIs, plus an LLM-backed JSON transformer.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod researcher;
pub mod transformer;

pub use client::{WaifuSdk, WaifuSdkBuilder};
pub use config::{ProviderKind, SdkConfig, TransformerConfig};
pub use error::{SdkError, TransformError, TransformErrorKind};
pub use researcher::{GenericResearcher, TokenQuery, TokenReport, TokenResearcher};
pub use transformer::{
    FieldType, OpenAiTransformer, OutputField, OutputFormat, TransformationContext,
};
