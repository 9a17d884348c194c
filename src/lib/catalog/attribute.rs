use crate::catalog::FieldValue;
use std::collections::HashMap;

/// How stored option codes map to labels
#[derive(Debug, Clone, PartialEq)]
pub enum OptionSource {
    Select(HashMap<String, String>),
    Multiselect(HashMap<String, String>),
    Boolean,
}

impl OptionSource {
    pub fn option_label(&self, value: &FieldValue) -> FieldValue {
        let code = match option_code(value) {
            Some(code) => code,
            None => return FieldValue::Null,
        };

        match self {
            Self::Select(options) => options.get(&code).cloned().into(),
            Self::Multiselect(options) => {
                let labels: Vec<String> = code
                    .split(',')
                    .filter_map(|code| options.get(code.trim()).cloned())
                    .collect();

                if labels.is_empty() {
                    return FieldValue::Null;
                }

                FieldValue::Labels(labels)
            }
            Self::Boolean => match code.as_str() {
                "0" => FieldValue::from("No"),
                "1" => FieldValue::from("Yes"),
                _ => FieldValue::Null,
            },
        }
    }
}

fn option_code(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::String(value) if !value.is_empty() => Some(value.clone()),
        FieldValue::Int(value) => Some(value.to_string()),
        FieldValue::Bool(value) => Some(if *value { "1" } else { "0" }.to_owned()),
        FieldValue::Ids(ids) if !ids.is_empty() => Some(
            ids.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeMetadata {
    options: Option<OptionSource>,
}

impl AttributeMetadata {
    pub fn plain() -> Self {
        Self { options: None }
    }

    pub fn with_options(options: OptionSource) -> Self {
        Self {
            options: Some(options),
        }
    }

    pub fn uses_source(&self) -> bool {
        self.options.is_some()
    }

    pub fn options(&self) -> Option<&OptionSource> {
        self.options.as_ref()
    }
}

/// Product attributes known to the catalog store
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeRepository {
    attributes: HashMap<String, AttributeMetadata>,
}

impl AttributeRepository {
    pub fn with_attribute(mut self, code: impl Into<String>, metadata: AttributeMetadata) -> Self {
        self.add_attribute(code, metadata);
        self
    }

    pub fn add_attribute(&mut self, code: impl Into<String>, metadata: AttributeMetadata) {
        self.attributes.insert(code.into(), metadata);
    }

    pub fn get(&self, code: impl AsRef<str>) -> Option<&AttributeMetadata> {
        self.attributes.get(code.as_ref())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
