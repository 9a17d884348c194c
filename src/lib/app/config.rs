use crate::catalog::{MySqlCatalogStore, StoreScope};
use crate::field::FieldContext;
use crate::sync::SyncConfig;

use mysql_async::{Opts, OptsBuilder};
use serde::de::{Error, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt::Formatter;

#[derive(PartialEq, Debug, Clone)]
pub struct ConnectionOpts(Opts);

#[derive(Deserialize, PartialEq, Debug, Clone)]
pub struct ApplicationConfig {
    database: String,
    #[serde(default)]
    table_prefix: String,
    connection: ConnectionOpts,
    store: StoreConfig,
    #[serde(default)]
    sync: SyncConfig,
}

/// Storefront the feed is generated for
#[derive(Deserialize, PartialEq, Debug, Clone)]
pub struct StoreConfig {
    base_url: String,
    #[serde(default)]
    media_url: Option<String>,
    #[serde(default = "StoreConfig::default_store_id")]
    store_id: u32,
    #[serde(default = "StoreConfig::default_website_id")]
    website_id: u32,
    #[serde(default)]
    customer_group_id: u32,
}

impl StoreConfig {
    fn default_store_id() -> u32 {
        1
    }

    fn default_website_id() -> u32 {
        1
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            media_url: None,
            store_id: Self::default_store_id(),
            website_id: Self::default_website_id(),
            customer_group_id: 0,
        }
    }

    pub fn with_media_url(self, media_url: impl Into<String>) -> Self {
        Self {
            media_url: Some(media_url.into()),
            ..self
        }
    }

    pub fn with_scope(self, store_id: u32, website_id: u32, customer_group_id: u32) -> Self {
        Self {
            store_id,
            website_id,
            customer_group_id,
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Media URL, `media/` under the base URL unless configured
    pub fn media_url(&self) -> String {
        match &self.media_url {
            Some(media_url) => media_url.clone(),
            None => format!("{}media/", self.base_url),
        }
    }

    pub fn scope(&self) -> StoreScope {
        StoreScope::new(self.store_id, self.website_id, self.customer_group_id)
    }
}

impl ApplicationConfig {
    pub fn new(
        database: impl Into<String>,
        connection: impl Into<ConnectionOpts>,
        store: StoreConfig,
    ) -> Self {
        Self {
            database: database.into(),
            table_prefix: Default::default(),
            connection: connection.into(),
            store,
            sync: SyncConfig::default(),
        }
    }

    pub fn with_table_prefix(self, table_prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: table_prefix.into(),
            ..self
        }
    }

    pub fn with_sync(self, sync: SyncConfig) -> Self {
        Self { sync, ..self }
    }

    pub fn create_store(&self) -> MySqlCatalogStore {
        let opts = OptsBuilder::from_opts(self.connection.0.clone()).db_name(Some(&self.database));

        MySqlCatalogStore::new(opts)
            .with_table_prefix(self.table_prefix.as_str())
            .with_scope(self.store.scope())
    }

    pub fn field_context(&self) -> FieldContext {
        FieldContext::new(self.store.base_url(), self.store.media_url())
    }

    pub fn database(&self) -> &str {
        self.database.as_str()
    }

    pub fn table_prefix(&self) -> &str {
        self.table_prefix.as_str()
    }

    pub fn store(&self) -> &StoreConfig {
        &self.store
    }

    pub fn sync(&self) -> &SyncConfig {
        &self.sync
    }
}

impl<'de> Deserialize<'de> for ConnectionOpts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ConnectionVisitor;

        enum ConnectionKey {
            Socket,
            User,
            Pass,
            Host,
            Port,
            StmtCacheSize,
            MaxAllowedPacket,
        }

        impl<'de> Deserialize<'de> for ConnectionKey {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct ConnectionKeyVisitor;
                impl<'de> Visitor<'de> for ConnectionKeyVisitor {
                    type Value = ConnectionKey;

                    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                        formatter.write_str("expecting a valid string key for connection")
                    }

                    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
                    where
                        E: Error,
                    {
                        Ok(match value {
                            "socket" => ConnectionKey::Socket,
                            "user" => ConnectionKey::User,
                            "pass" => ConnectionKey::Pass,
                            "host" => ConnectionKey::Host,
                            "port" => ConnectionKey::Port,
                            "stmt_cache_size" => ConnectionKey::StmtCacheSize,
                            "max_allowed_packet" => ConnectionKey::MaxAllowedPacket,
                            other => {
                                return Err(E::custom(format!(
                                    "unknown connection key \"{other}\""
                                )))
                            }
                        })
                    }
                }

                deserializer.deserialize_identifier(ConnectionKeyVisitor)
            }
        }

        impl<'de> Visitor<'de> for ConnectionVisitor {
            type Value = ConnectionOpts;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("a valid URL or connection options for MySQL")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                match Opts::from_url(v) {
                    Ok(opts) => Ok(ConnectionOpts(opts)),
                    Err(err) => Err(E::custom(err.to_string())),
                }
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: Error,
            {
                match Opts::from_url(&v) {
                    Ok(opts) => Ok(ConnectionOpts(opts)),
                    Err(err) => Err(E::custom(err.to_string())),
                }
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut builder = OptsBuilder::default();

                while let Some(key) = map.next_key::<ConnectionKey>()? {
                    builder = match key {
                        ConnectionKey::Socket => builder.socket(Some(map.next_value::<String>()?)),
                        ConnectionKey::User => builder.user(Some(map.next_value::<String>()?)),
                        ConnectionKey::Pass => builder.pass(Some(map.next_value::<String>()?)),
                        ConnectionKey::Host => builder.ip_or_hostname(map.next_value::<String>()?),
                        ConnectionKey::Port => builder.tcp_port(map.next_value()?),
                        ConnectionKey::StmtCacheSize => {
                            builder.stmt_cache_size(Some(map.next_value()?))
                        }
                        ConnectionKey::MaxAllowedPacket => {
                            builder.max_allowed_packet(Some(map.next_value()?))
                        }
                    }
                }

                Ok(ConnectionOpts(builder.into()))
            }
        }

        deserializer.deserialize_any(ConnectionVisitor)
    }
}

impl From<Opts> for ConnectionOpts {
    fn from(value: Opts) -> Self {
        ConnectionOpts(value)
    }
}

impl From<OptsBuilder> for ConnectionOpts {
    fn from(value: OptsBuilder) -> Self {
        ConnectionOpts(value.into())
    }
}
