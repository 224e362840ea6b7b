use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Named input parameter of a job.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Default, Debug, Clone, Hash, PartialEq, Eq)]
pub struct JobOption {
    /// Name of the option, options without a name are ignored.
    #[serde(default)]
    pub name: String,
    /// Display label of the option.
    pub label: Option<String>,
    pub description: Option<String>,
    /// Value the option takes when the caller doesn't provide one.
    pub default_value: Option<String>,
    /// Predefined values the option can take.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_choices: Vec<String>,
    /// URL of a remote list of values the option can take.
    pub value_choices_url: Option<String>,
    /// Only allow one of the predefined values.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub require_predefined_choice: bool,
    /// Regular expression the value must match.
    pub validation_regex: Option<String>,
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub required: bool,
    /// Allow multiple values to be selected.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub allow_multiple_values: bool,
    /// Delimiter used to join multiple selected values.
    pub multi_value_delimiter: Option<String>,
    /// Mask the value in the UI and logs. Required for `exposed_to_scripts` and `storage_path`.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub obscure_input: bool,
    /// Expose the secure value to scripts and commands.
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub exposed_to_scripts: bool,
    /// Key storage path to read the default value from.
    pub storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub is_date: bool,
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "crate::utils::is_false")]
    pub sort_values: bool,
    /// Option type (`text` or `file`), defaults to `text`.
    pub option_type: Option<String>,
}

impl JobOption {
    /// Creates option with the specified name.
    pub fn named<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::jobs::JobOption;
    use insta::assert_json_snapshot;

    #[test]
    fn serialization() -> anyhow::Result<()> {
        let option = JobOption {
            default_value: Some("production".to_string()),
            value_choices: vec!["staging".to_string(), "production".to_string()],
            require_predefined_choice: true,
            ..JobOption::named("environment")
        };
        assert_json_snapshot!(option, @r###"
        {
          "name": "environment",
          "default_value": "production",
          "value_choices": [
            "staging",
            "production"
          ],
          "require_predefined_choice": true
        }
        "###);

        Ok(())
    }

    #[test]
    fn deserialization() -> anyhow::Result<()> {
        let option: JobOption = toml::from_str(
            r#"
        name = "db_password"
        obscure_input = true
        storage_path = "keys/db/password"
    "#,
        )?;
        assert_eq!(
            option,
            JobOption {
                obscure_input: true,
                storage_path: Some("keys/db/password".to_string()),
                ..JobOption::named("db_password")
            }
        );

        let option: JobOption = toml::from_str(r#"label = "Unnamed""#)?;
        assert!(option.name.is_empty());

        Ok(())
    }
}
