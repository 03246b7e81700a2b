use spt_core::{Effect, Msg, Severity};
use spt_link::{PresetStore, StoreError};
use spt_logging::{spt_error, spt_info};

/// Performs the side effects the core asks for and reports them as notices.
pub struct EffectRunner {
    store: PresetStore,
}

impl EffectRunner {
    pub fn new(store: PresetStore) -> Self {
        Self { store }
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<(Severity, String)> {
        let mut notices = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::Notify { severity, text } => notices.push((severity, text)),
                Effect::WritePreset {
                    name,
                    format,
                    contents,
                } => match self.store.save(&name, format, &contents) {
                    Ok(path) => notices.push((
                        Severity::Success,
                        format!("Preset '{name}' saved to {}.", path.display()),
                    )),
                    Err(err) => {
                        spt_error!("Failed to save preset {:?}: {}", name, err);
                        notices.push((
                            Severity::Error,
                            format!("Preset '{name}' not saved: {err}"),
                        ));
                    }
                },
            }
        }
        notices
    }

    /// Reads a stored preset into the message that applies it.
    pub fn read_preset(&self, name: &str) -> Result<Msg, StoreError> {
        let (contents, format) = self.store.load(name)?;
        spt_info!("Read preset {:?} ({} bytes)", name, contents.len());
        Ok(Msg::PresetLoaded {
            name: name.to_string(),
            contents,
            format,
        })
    }

    pub fn list_presets(&self) -> Result<Vec<String>, StoreError> {
        self.store.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spt_core::PresetFormat;
    use tempfile::TempDir;

    #[test]
    fn written_preset_can_be_read_back_as_message() {
        let temp = TempDir::new().unwrap();
        let runner = EffectRunner::new(PresetStore::new(temp.path()));

        let notices = runner.run(vec![Effect::WritePreset {
            name: "fine".to_string(),
            format: PresetFormat::Json,
            contents: b"{}".to_vec(),
        }]);

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, Severity::Success);
        assert_eq!(
            runner.read_preset("fine").unwrap(),
            Msg::PresetLoaded {
                name: "fine".to_string(),
                contents: b"{}".to_vec(),
                format: PresetFormat::Json,
            }
        );
        assert_eq!(runner.list_presets().unwrap(), vec!["fine"]);
    }

    #[test]
    fn failed_write_becomes_error_notice() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("presets");
        std::fs::write(&blocker, "not a dir").unwrap();
        let runner = EffectRunner::new(PresetStore::new(blocker));

        let notices = runner.run(vec![
            Effect::Notify {
                severity: Severity::Info,
                text: "hello".to_string(),
            },
            Effect::WritePreset {
                name: "fine".to_string(),
                format: PresetFormat::Ron,
                contents: b"()".to_vec(),
            },
        ]);

        assert_eq!(notices[0], (Severity::Info, "hello".to_string()));
        assert_eq!(notices[1].0, Severity::Error);
    }
}
