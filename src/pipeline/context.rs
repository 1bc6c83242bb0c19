use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::classifier::{NetworkModel, PlantClassifier};
use crate::config::{Config, DEFAULT_MAX_DIMENSION};
use crate::identify::{PlantIdClient, PlantIdentifier};
use crate::summary::SummaryPolicy;
use crate::vocabulary::PlantVocabulary;

/// Everything a request needs, built once at startup and shared read-only
/// between request threads.
#[derive(Clone)]
pub struct AppContext {
    pub classifier: PlantClassifier,
    pub identifier: Arc<dyn PlantIdentifier>,
    pub policy: SummaryPolicy,
    pub upload_dir: PathBuf,
    pub max_dimension: u32,
}

impl AppContext {
    pub fn new(
        classifier: PlantClassifier,
        identifier: Arc<dyn PlantIdentifier>,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        AppContext {
            classifier,
            identifier,
            policy: SummaryPolicy::default(),
            upload_dir: upload_dir.into(),
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    pub fn with_policy(mut self, policy: SummaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Loads the model and summary policy and builds the HTTP client.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let model = NetworkModel::load(&config.model_path)?;
        let classifier = PlantClassifier::new(Arc::new(model), Arc::new(PlantVocabulary::default()))
            .with_top_k(config.top_k);
        let descriptor = classifier.descriptor();
        info!(
            model = %descriptor.name,
            path = %config.model_path.display(),
            classes = descriptor.classes,
            "model loaded"
        );

        let policy = match &config.summary_policy_path {
            Some(path) => SummaryPolicy::load_json(path)?,
            None => SummaryPolicy::default(),
        };

        if config.identify.api_key.is_none() {
            warn!("PLANT_ID_API_KEY is not set; identification requests will be unauthenticated");
        }
        let client = PlantIdClient::new(config.identify.clone())?;

        Ok(AppContext::new(classifier, Arc::new(client), config.upload_dir.clone())
            .with_policy(policy)
            .with_max_dimension(config.max_dimension))
    }
}
