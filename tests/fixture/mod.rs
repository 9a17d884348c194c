use mysql_async::prelude::*;
use mysql_async::{Conn, Error, Opts, OptsBuilder};
use mysql_common::value::Value;

pub struct Fixture {
    conn: Conn,
    database: &'static str,
}

static DATABASE_SCHEMA: [&str; 14] = [
    r#"CREATE TABLE eav_entity_type (
            entity_type_id SMALLINT UNSIGNED NOT NULL AUTO_INCREMENT,
            entity_type_code VARCHAR(50) NOT NULL,
            PRIMARY KEY(entity_type_id)
        )"#,
    r#"CREATE TABLE eav_attribute (
            attribute_id SMALLINT UNSIGNED NOT NULL AUTO_INCREMENT,
            entity_type_id SMALLINT UNSIGNED NOT NULL,
            attribute_code VARCHAR(255) NOT NULL,
            backend_type VARCHAR(8) NOT NULL DEFAULT 'static',
            frontend_input VARCHAR(50),
            source_model VARCHAR(255),
            PRIMARY KEY(attribute_id)
        )"#,
    r#"CREATE TABLE eav_attribute_option (
            option_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            attribute_id SMALLINT UNSIGNED NOT NULL,
            PRIMARY KEY(option_id)
        )"#,
    r#"CREATE TABLE eav_attribute_option_value (
            value_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            option_id INT UNSIGNED NOT NULL,
            store_id SMALLINT UNSIGNED NOT NULL,
            value VARCHAR(255),
            PRIMARY KEY(value_id)
        )"#,
    r#"CREATE TABLE catalog_product_entity (
            entity_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            type_id VARCHAR(32) NOT NULL DEFAULT 'simple',
            sku VARCHAR(64) NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY(entity_id)
        )"#,
    r#"CREATE TABLE catalog_product_entity_varchar (
            value_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            attribute_id SMALLINT UNSIGNED NOT NULL,
            store_id SMALLINT UNSIGNED NOT NULL,
            entity_id INT UNSIGNED NOT NULL,
            value VARCHAR(255),
            PRIMARY KEY(value_id)
        )"#,
    r#"CREATE TABLE catalog_product_entity_int (
            value_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            attribute_id SMALLINT UNSIGNED NOT NULL,
            store_id SMALLINT UNSIGNED NOT NULL,
            entity_id INT UNSIGNED NOT NULL,
            value INT,
            PRIMARY KEY(value_id)
        )"#,
    r#"CREATE TABLE catalog_product_entity_decimal (
            value_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            attribute_id SMALLINT UNSIGNED NOT NULL,
            store_id SMALLINT UNSIGNED NOT NULL,
            entity_id INT UNSIGNED NOT NULL,
            value DECIMAL(20, 6),
            PRIMARY KEY(value_id)
        )"#,
    r#"CREATE TABLE catalog_product_entity_text (
            value_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            attribute_id SMALLINT UNSIGNED NOT NULL,
            store_id SMALLINT UNSIGNED NOT NULL,
            entity_id INT UNSIGNED NOT NULL,
            value MEDIUMTEXT,
            PRIMARY KEY(value_id)
        )"#,
    r#"CREATE TABLE catalog_product_entity_datetime (
            value_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            attribute_id SMALLINT UNSIGNED NOT NULL,
            store_id SMALLINT UNSIGNED NOT NULL,
            entity_id INT UNSIGNED NOT NULL,
            value DATETIME,
            PRIMARY KEY(value_id)
        )"#,
    r#"CREATE TABLE cataloginventory_stock_status (
            product_id INT UNSIGNED NOT NULL,
            website_id SMALLINT UNSIGNED NOT NULL,
            stock_id SMALLINT UNSIGNED NOT NULL DEFAULT 1,
            qty DECIMAL(12, 4) NOT NULL DEFAULT 0,
            stock_status SMALLINT UNSIGNED NOT NULL,
            PRIMARY KEY(product_id, website_id, stock_id)
        )"#,
    r#"CREATE TABLE catalog_category_product (
            entity_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            category_id INT UNSIGNED NOT NULL,
            product_id INT UNSIGNED NOT NULL,
            position INT NOT NULL DEFAULT 0,
            PRIMARY KEY(entity_id)
        )"#,
    r#"CREATE TABLE catalog_product_index_price (
            entity_id INT UNSIGNED NOT NULL,
            customer_group_id INT UNSIGNED NOT NULL,
            website_id SMALLINT UNSIGNED NOT NULL,
            price DECIMAL(20, 6),
            final_price DECIMAL(20, 6),
            PRIMARY KEY(entity_id, customer_group_id, website_id)
        )"#,
    r#"CREATE TABLE url_rewrite (
            url_rewrite_id INT UNSIGNED NOT NULL AUTO_INCREMENT,
            entity_type VARCHAR(32) NOT NULL,
            entity_id INT UNSIGNED NOT NULL,
            request_path VARCHAR(255),
            redirect_type SMALLINT UNSIGNED NOT NULL DEFAULT 0,
            store_id SMALLINT UNSIGNED NOT NULL,
            metadata VARCHAR(255),
            PRIMARY KEY(url_rewrite_id)
        )"#,
];

impl Fixture {
    pub async fn create_with_database(database: &'static str) -> Result<Self, Error> {
        let mut connection = Self::create_connection().await?;
        connection
            .query_drop(format!("DROP DATABASE IF EXISTS {database}"))
            .await?;
        connection
            .query_drop(format!("CREATE DATABASE {database}"))
            .await?;

        connection.query_drop(format!("USE {database}")).await?;

        for query in DATABASE_SCHEMA {
            connection.query_drop(query).await?;
        }

        Ok(Self {
            conn: connection,
            database,
        })
    }

    pub async fn create_connection() -> Result<Conn, Error> {
        Conn::new(Self::connection_options()).await
    }

    pub fn connection_options() -> Opts {
        let url = std::env::var("TEST_MYSQL_URL")
            .unwrap_or_else(|_| "mysql://root@127.0.0.1:3306/".to_owned());

        Opts::from_url(&url).unwrap()
    }

    pub fn database_options(&self) -> OptsBuilder {
        OptsBuilder::from_opts(Self::connection_options()).db_name(Some(self.database))
    }

    pub async fn execute_queries(
        &mut self,
        queries: impl IntoIterator<Item = impl AsQuery>,
    ) -> Result<(), Error> {
        for query in queries {
            self.conn.query_drop(query).await?;
        }
        Ok(())
    }

    pub async fn insert_into<const N: usize>(
        &mut self,
        table: &'static str,
        columns: [&'static str; N],
        rows: Vec<impl BatchRow>,
    ) -> Result<(), Error> {
        let column_expr = columns.join("`,`");
        let single_row_expr = format!("({})", columns.map(|_| "?").join(","));

        let rows_expr = rows
            .iter()
            .map(|_| single_row_expr.clone())
            .collect::<Vec<_>>()
            .join(",");

        let query = format!("INSERT INTO `{table}` (`{column_expr}`) VALUES {rows_expr}");

        let rows_count = rows.len();

        let params =
            rows.into_iter()
                .fold(Vec::with_capacity(rows_count * N), |mut params, row| {
                    row.add_to_params(&mut params);
                    params
                });

        self.conn.exec_drop(query, params).await
    }

    pub async fn cleanup(mut self) -> Result<(), Error> {
        self.conn
            .query_drop(format!("DROP DATABASE IF EXISTS {}", self.database))
            .await?;
        self.conn.disconnect().await
    }
}

pub trait BatchRow {
    fn add_to_params(self, params: &mut Vec<Value>);
}

impl<T1, T2> BatchRow for (T1, T2)
where
    T1: Into<Value>,
    T2: Into<Value>,
{
    fn add_to_params(self, params: &mut Vec<Value>) {
        params.push(self.0.into());
        params.push(self.1.into());
    }
}

impl<T1, T2, T3> BatchRow for (T1, T2, T3)
where
    T1: Into<Value>,
    T2: Into<Value>,
    T3: Into<Value>,
{
    fn add_to_params(self, params: &mut Vec<Value>) {
        params.push(self.0.into());
        params.push(self.1.into());
        params.push(self.2.into());
    }
}

impl<T1, T2, T3, T4> BatchRow for (T1, T2, T3, T4)
where
    T1: Into<Value>,
    T2: Into<Value>,
    T3: Into<Value>,
    T4: Into<Value>,
{
    fn add_to_params(self, params: &mut Vec<Value>) {
        params.push(self.0.into());
        params.push(self.1.into());
        params.push(self.2.into());
        params.push(self.3.into());
    }
}

impl<T1, T2, T3, T4, T5> BatchRow for (T1, T2, T3, T4, T5)
where
    T1: Into<Value>,
    T2: Into<Value>,
    T3: Into<Value>,
    T4: Into<Value>,
    T5: Into<Value>,
{
    fn add_to_params(self, params: &mut Vec<Value>) {
        params.push(self.0.into());
        params.push(self.1.into());
        params.push(self.2.into());
        params.push(self.3.into());
        params.push(self.4.into());
    }
}
