#[macro_export]
macro_rules! catalog_product {
    ($id:expr) => {
        $crate::catalog::Product::new($id, "simple")
    };
    ($id:expr, $type_id:expr) => {
        $crate::catalog::Product::new($id, $type_id)
    };
    ($id:expr, $type_id:expr, {$($code:expr => $value:expr),* $(,)?}) => {
        $crate::catalog::Product::new($id, $type_id)
            $(.with_attribute($code, $value))*
    };
}

macro_rules! output_test {
    ($formatter:expr, $batch:expr, $expected:expr) => {
        let mut buffer = std::io::Cursor::new(Vec::new());
        $crate::output::Output::write(&$formatter, &mut buffer, $batch)
            .await
            .unwrap();

        assert_eq!($expected, buffer.into_inner().into())
    };
}
