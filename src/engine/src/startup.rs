use crate::{
    MaritimeEngine, Result,
    error::error::{JoinSnafu, SerializeSnafu},
    settings::Settings,
};
use clap::Subcommand;
use density::{DensityGrid, hotspots};
use maritime_core::{H3DensityCell, QualityMetrics, ReferenceData, SyntheticGenerationConfig};
use serde::Serialize;
use snafu::ResultExt;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, instrument};

const HOTSPOT_SHARE: f64 = 0.1;
const SUMMARY_HOTSPOTS: usize = 5;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate the configured scenario and print a validation and quality summary
    Generate {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        vessels: Option<u32>,
    },
    /// Generate the configured scenario and print its density grid
    Grid {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        resolution: Option<u8>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    pub config_hash: String,
    pub seed: u64,
    pub vessels: usize,
    pub overall_realism_score: Option<f64>,
    pub confidence_level: Option<f64>,
    pub quality: QualityMetrics,
    pub occupied_cells: usize,
    pub hotspots: Vec<H3DensityCell>,
}

enum Analysis {
    Quality(QualityMetrics),
    Grid(Result<DensityGrid>),
}

pub struct App {
    engine: Arc<MaritimeEngine>,
    settings: Settings,
}

impl App {
    pub fn build(settings: Settings) -> App {
        let engine = MaritimeEngine::new(
            Arc::default(),
            Arc::new(ReferenceData::default_reference()),
            &settings.cache,
        );

        App {
            engine: Arc::new(engine),
            settings,
        }
    }

    /// Runs the command and returns its JSON output.
    pub async fn run(self, command: Command) -> Result<String> {
        match command {
            Command::Generate { seed, vessels } => {
                let summary = self.generate(seed, vessels).await?;
                serde_json::to_string_pretty(&summary).context(SerializeSnafu)
            }
            Command::Grid { seed, resolution } => {
                let grid = self.grid(seed, resolution).await?;
                let cells: Vec<&H3DensityCell> = grid.values().collect();
                serde_json::to_string_pretty(&cells).context(SerializeSnafu)
            }
        }
    }

    /// Quality assessment and grid aggregation of the generated population run concurrently.
    #[instrument(skip_all)]
    pub async fn generate(
        &self,
        seed: Option<u64>,
        vessels: Option<u32>,
    ) -> Result<GenerationSummary> {
        let config = SyntheticGenerationConfig {
            vessel_count_target: vessels.unwrap_or(self.settings.scenario.vessel_count_target),
            ..self.settings.scenario.clone()
        };
        let seed = seed.unwrap_or(self.settings.seed);
        let resolution = self.settings.density_resolution;

        let engine = self.engine.clone();
        let dataset = tokio::task::spawn_blocking(move || engine.generate_synthetic(&config, seed))
            .await
            .context(JoinSnafu)??;

        let mut set = JoinSet::new();
        {
            let engine = self.engine.clone();
            let dataset = dataset.clone();
            set.spawn_blocking(move || Analysis::Quality(engine.assess_quality(&dataset.vessels)));
        }
        {
            let engine = self.engine.clone();
            let dataset = dataset.clone();
            set.spawn_blocking(move || {
                Analysis::Grid(engine.build_density_grid(&dataset.vessels, resolution))
            });
        }

        let mut quality = QualityMetrics::empty();
        let mut grid = DensityGrid::new();
        while let Some(analysis) = set.join_next().await {
            match analysis.context(JoinSnafu)? {
                Analysis::Quality(metrics) => quality = metrics,
                Analysis::Grid(result) => grid = result?,
            }
        }

        info!(
            "generated {} vessels over {} cells",
            dataset.vessels.len(),
            grid.len()
        );

        Ok(GenerationSummary {
            config_hash: dataset.metadata.config_hash.clone(),
            seed,
            vessels: dataset.vessels.len(),
            overall_realism_score: dataset.validation.as_ref().map(|v| v.overall_realism_score),
            confidence_level: dataset.validation.as_ref().map(|v| v.confidence_level),
            quality,
            occupied_cells: grid.len(),
            hotspots: hotspots(&grid, HOTSPOT_SHARE)
                .into_iter()
                .take(SUMMARY_HOTSPOTS)
                .cloned()
                .collect(),
        })
    }

    #[instrument(skip_all)]
    pub async fn grid(&self, seed: Option<u64>, resolution: Option<u8>) -> Result<DensityGrid> {
        let config = self.settings.scenario.clone();
        let seed = seed.unwrap_or(self.settings.seed);
        let resolution = resolution.unwrap_or(self.settings.density_resolution);

        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || {
            let dataset = engine.generate_synthetic(&config, seed)?;
            engine.build_density_grid(&dataset.vessels, resolution)
        })
        .await
        .context(JoinSnafu)?
    }
}
