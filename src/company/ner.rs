use pyo3::prelude::*;
use tracing::{debug, info, warn};

/// spaCy's label for companies, agencies and institutions.
const ORG_LABEL: &str = "ORG";

/// Something that can tag organization spans in free text.
///
/// Implementations own their failure handling: a broken model yields an
/// empty list, never an error, so the extractor keeps working on regexes.
pub trait EntityRecognizer: Send + Sync {
    fn organizations(&self, text: &str) -> Vec<String>;
}

/// Organization tagging through a spaCy pipeline loaded once in-process.
pub struct SpacyRecognizer {
    nlp: Py<PyAny>,
    model: String,
}

impl SpacyRecognizer {
    /// Load `model` with spaCy. Returns `None` when Python, spaCy or the
    /// model is missing.
    pub fn load(model: &str) -> Option<Self> {
        let loaded = Python::with_gil(|py| -> PyResult<Py<PyAny>> {
            let spacy = py.import("spacy")?;
            let nlp = spacy.call_method1("load", (model,))?;
            Ok(nlp.unbind())
        });

        match loaded {
            Ok(nlp) => {
                info!(model, "spaCy entity recognizer loaded");
                Some(Self {
                    nlp,
                    model: model.to_string(),
                })
            }
            Err(e) => {
                info!(model, "spaCy unavailable, entity recognition disabled: {}", e);
                None
            }
        }
    }

    /// Honour `ENABLE_NER` and `SPACY_MODEL`.
    pub fn from_env() -> Option<Self> {
        let enabled = dotenv::var("ENABLE_NER")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);
        if !enabled {
            info!("Entity recognition disabled by ENABLE_NER");
            return None;
        }
        let model = dotenv::var("SPACY_MODEL").unwrap_or_else(|_| "en_core_web_sm".to_string());
        Self::load(&model)
    }

    fn run(&self, text: &str) -> PyResult<Vec<String>> {
        Python::with_gil(|py| {
            let doc = self.nlp.bind(py).call1((text,))?;
            let mut orgs = Vec::new();
            for ent in doc.getattr("ents")?.try_iter()? {
                let ent = ent?;
                let label: String = ent.getattr("label_")?.extract()?;
                if label != ORG_LABEL {
                    continue;
                }
                let span: String = ent.getattr("text")?.extract()?;
                let span = span.trim();
                if !span.is_empty() {
                    orgs.push(span.to_string());
                }
            }
            Ok(orgs)
        })
    }
}

impl EntityRecognizer for SpacyRecognizer {
    fn organizations(&self, text: &str) -> Vec<String> {
        match self.run(text) {
            Ok(orgs) => {
                debug!(model = %self.model, count = orgs.len(), "spaCy organizations");
                orgs
            }
            Err(e) => {
                warn!(model = %self.model, "spaCy entity recognition failed: {}", e);
                Vec::new()
            }
        }
    }
}
