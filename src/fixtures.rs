#[cfg(test)]
pub mod test {
    use std::collections::HashMap;

    use confique::Config;

    use crate::error::DictLdapError;
    use crate::map::RawMapSettings;
    use crate::settings::DictConfig;
    use crate::source::SettingsSource;

    /// A raw map with schema defaults, the given pattern and filter, and one value.
    pub fn raw_map(pattern: &str, filter: &str) -> RawMapSettings {
        let mut raw = RawMapSettings::builder().load().unwrap();
        raw.pattern = pattern.into();
        raw.filter = filter.into();
        raw.values = vec!["mail".into()];
        raw
    }

    /// In-memory settings source. Maps not inserted are reported missing.
    #[derive(Default)]
    pub struct MemorySource {
        pub names: Vec<String>,
        pub maps: HashMap<String, RawMapSettings>,
    }

    impl MemorySource {
        pub fn with_map(mut self, name: &str, raw: RawMapSettings) -> Self {
            self.names.push(name.into());
            self.maps.insert(name.into(), raw);
            self
        }

        /// Declare a name without providing its settings.
        pub fn declare(mut self, name: &str) -> Self {
            self.names.push(name.into());
            self
        }
    }

    impl SettingsSource for MemorySource {
        fn dict_config(&self) -> Result<DictConfig, DictLdapError> {
            Ok(DictConfig {
                maps: self.names.clone(),
            })
        }

        fn map_settings(&self, name: &str) -> Result<RawMapSettings, DictLdapError> {
            self.maps
                .get(name)
                .cloned()
                .ok_or_else(|| DictLdapError::MapNotFound(name.into()))
        }
    }

    /// Two valid maps in TOML form.
    pub const TWO_MAPS: &str = r#"
maps = ["users", "quota"]

[map.users]
pattern = "priv/$user"
filter = "(uid=$user)"
base = "ou=people,dc=example,dc=com"
values = ["mail"]

[map.quota]
pattern = "shared/quota/${user}@${domain}"
filter = "(&(uid=$user)(dc=$domain))"
base = "dc=$domain,dc=com"
scope = "onelevel"
username_attribute = "uid"
values = "quotaStorage quotaMessages"
"#;

    #[test]
    fn raw_map_fixture_is_valid() {
        let mut raw = raw_map("priv/$user", "(uid=$user)");
        assert!(crate::map::validate_map(&mut raw).is_ok());
    }
}
