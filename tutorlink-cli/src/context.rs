use std::path::PathBuf;
use tutorlink::config::{ConfigBuilder, ConfigLoader};
use tutorlink::prelude::*;

/// Where the CLI reads its configuration and keeps its data
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    pub data_dir: Option<String>,
    pub config_file: Option<PathBuf>,
    pub memory: bool,
}

pub struct TutorlinkCliContext {
    pub engine: Tutorlink,
}

impl TutorlinkCliContext {
    pub async fn new(options: ContextOptions) -> tutorlink::Result<Self> {
        let mut loader = ConfigLoader::new();
        match &options.config_file {
            Some(path) => {
                loader.load_file(path)?;
            }
            None => {
                loader.load_default_files();
            }
        }
        loader.load_env();

        let mut builder = ConfigBuilder::from_config(loader.extract()?);
        if options.memory {
            builder = builder.with_memory_storage();
        } else {
            if let Some(dir) = options.data_dir {
                builder = builder.with_data_dir(dir);
            }
            builder = builder.with_default_storage();
        }

        let engine = Tutorlink::new(builder.build()?).await?;
        Ok(Self { engine })
    }

    pub fn from_engine(engine: Tutorlink) -> Self {
        Self { engine }
    }

    pub fn service(&self) -> &RelationshipService {
        self.engine.service()
    }

    pub fn store(&self) -> &std::sync::Arc<dyn PairingStore> {
        self.engine.store()
    }
}
