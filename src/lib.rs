pub mod config;
pub mod core;
pub mod extract;
pub mod gateway;
pub mod pipeline;
pub mod providers;
pub mod registry;
pub mod retry;
pub mod script;
pub mod segment;
pub mod transport;

pub use config::PipelineConfig;
pub use self::core::error::{
    ConfigError, ExtractionError, GatewayError, PipelineError, PipelineFailure, RoutingError,
};
pub use self::core::traits::{GenerationAdapter, ModelGateway, Segmenter, TranslationAdapter};
pub use self::core::types::*;
pub use gateway::{Gateway, GatewayBuilder};
pub use pipeline::{
    OtherLanguagePipeline, StageBudgets, TranslationPipeline, TranslationPipelineBuilder,
};
pub use retry::RetryBudget;
pub use segment::DictionarySegmenter;
