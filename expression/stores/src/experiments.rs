use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Error};
use design_importer::persistence::{DesignPersister, PersistenceError};
use experiment::bio_material::BioMaterial;
use experiment::design::ExperimentalDesign;
use experiment::experiment::ExpressionExperiment;
use experiment::factor::{ExperimentalFactor, FactorValue};
use experiment::file;
use experiment::names::ShortName;
use tracing::{debug, info, Level};

pub fn build_experiment_file_path(short_name: &ShortName, directory: &Path) -> PathBuf {
    let mut experiment_file_path: PathBuf = PathBuf::from(directory);
    experiment_file_path.push(format!("{}.experiment.json", short_name));
    experiment_file_path
}

/// Experiments stored as one JSON file each, `<short_name>.experiment.json`, in a directory.
#[derive(Debug, Clone)]
pub struct ExperimentStore {
    directory: PathBuf,
}

impl ExperimentStore {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
        }
    }

    pub fn path(&self, short_name: &ShortName) -> PathBuf {
        build_experiment_file_path(short_name, &self.directory)
    }

    pub fn exists(&self, short_name: &ShortName) -> bool {
        self.path(short_name).exists()
    }

    #[tracing::instrument(level = Level::DEBUG)]
    pub fn load(&self, short_name: &ShortName) -> Result<ExpressionExperiment, Error> {
        let path = self.path(short_name);
        info!("Loading experiment. path: {}", path.display());

        let experiment: ExpressionExperiment =
            file::load(&path).with_context(|| format!("Error loading experiment. path: {}", path.display()))?;

        if experiment.short_name != *short_name {
            return Err(anyhow!(
                "Experiment file is for a different experiment. path: {}, short_name: {}",
                path.display(),
                experiment.short_name
            ));
        }

        Ok(experiment)
    }

    pub fn save(&self, experiment: &ExpressionExperiment) -> Result<(), Error> {
        let path = self.path(&experiment.short_name);
        debug!("Saving experiment. path: {}", path.display());

        file::save(experiment, &path).with_context(|| format!("Error saving experiment. path: {}", path.display()))
    }
}

/// Persists design changes to an [`ExperimentStore`], writing the experiment file after every change.
pub struct StoreDesignPersister {
    store: ExperimentStore,
    stored: ExpressionExperiment,
}

impl StoreDesignPersister {
    pub fn open(store: ExperimentStore, short_name: &ShortName) -> Result<Self, Error> {
        let stored = store.load(short_name)?;

        Ok(Self {
            store,
            stored,
        })
    }

    /// The experiment as it is currently stored.
    pub fn stored(&self) -> &ExpressionExperiment {
        &self.stored
    }

    fn check_experiment(&self, experiment: &ShortName) -> Result<(), Error> {
        if *experiment != self.stored.short_name {
            return Err(anyhow!(
                "Persister is for a different experiment. expected: {}",
                self.stored.short_name
            ));
        }
        Ok(())
    }

    fn apply<F>(&mut self, experiment: &ShortName, entity: String, f: F) -> Result<(), PersistenceError>
    where
        F: FnOnce(&mut ExpressionExperiment) -> Result<(), Error>,
    {
        self.check_experiment(experiment)
            .and_then(|_| f(&mut self.stored))
            .and_then(|_| self.store.save(&self.stored))
            .map_err(|reason| PersistenceError::new(experiment, entity, reason))
    }
}

impl DesignPersister for StoreDesignPersister {
    fn create_factor(&mut self, experiment: &ShortName, factor: &ExperimentalFactor) -> Result<(), PersistenceError> {
        let entity = format!("factor '{}'", factor.name);
        self.apply(experiment, entity, |stored| {
            stored
                .design_mut()
                .add_factor(factor.clone())?;
            Ok(())
        })
    }

    fn create_factor_value(
        &mut self,
        experiment: &ShortName,
        factor_value: &FactorValue,
    ) -> Result<(), PersistenceError> {
        let entity = format!("factor value {}", factor_value.id);
        self.apply(experiment, entity, |stored| {
            stored
                .design_mut()
                .insert_factor_value(factor_value.clone())?;
            Ok(())
        })
    }

    fn update_design(&mut self, experiment: &ShortName, design: &ExperimentalDesign) -> Result<(), PersistenceError> {
        self.apply(experiment, "design".to_string(), |stored| {
            stored.replace_design(design.clone());
            Ok(())
        })
    }

    fn update_bio_material(
        &mut self,
        experiment: &ShortName,
        bio_material: &BioMaterial,
    ) -> Result<(), PersistenceError> {
        let entity = format!("bio material '{}'", bio_material.name);
        self.apply(experiment, entity, |stored| {
            stored.replace_bio_material(bio_material.clone())?;
            Ok(())
        })
    }
}
