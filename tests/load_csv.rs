use pretty_assertions::assert_eq;
use sales_dashboard::data::{DataLoader, LoaderError, NormalizeOptions};
use sales_dashboard::stats::{DashboardSummary, ScatterFilter, StatsCalculator};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "product_id,product_name,category,discounted_price,actual_price,discount_percentage,rating,rating_count";

fn write_csv(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{header}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn sample_export() -> NamedTempFile {
    write_csv(
        HEADER,
        &[
            r#"B07JW9H4J1,"Wayona Nylon Braided USB-C Cable",Electronics|Accessories|Cables,"₹1,099","₹1,999",45%,4.2,"24,269""#,
            r#"B098NS6PVG,"Ambrane 60W Charger",Electronics|Accessories|Chargers,₹199,₹349,43%,—,"43,994""#,
            r#"B096MSW6CT,"Sounce Fast Phone Charging Cable",Computers&Accessories|Accessories&Peripherals|Cables,₹329,₹699,53%,3.9,"7,928""#,
            r#"B08HDJ86NZ,"Pigeon Kettle",Home&Kitchen|Kitchen&HomeAppliances|Kettles,₹649,₹799,19%,4.1,"1,234""#,
            r#"B0B3RRWSF6,"Orient Fan",Home&Kitchen|Heating,"₹1,299","₹1,999",35%,4.0,"#,
        ],
    )
}

#[test]
fn loads_and_normalizes_reference_row() {
    let file = sample_export();
    let dataset = DataLoader::default().load_csv(file.path()).unwrap();

    assert_eq!(dataset.row_count(), 5);

    let cable = &dataset.records().unwrap()[0];
    assert_eq!(cable.product_name, "Wayona Nylon Braided USB-C Cable");
    assert_eq!(cable.discounted_price, Some(1099.0));
    assert_eq!(cable.actual_price, Some(1999.0));
    assert_eq!(cable.discount_percentage, Some(45.0));
    assert_eq!(cable.rating, Some(4.2));
    assert_eq!(cable.rating_count, Some(24269.0));
    assert_eq!(cable.main_category.as_deref(), Some("Electronics"));
    assert_eq!(cable.estimated_sales, Some(26_671_631.0));
}

#[test]
fn extra_columns_survive_normalization() {
    let file = sample_export();
    let dataset = DataLoader::default().load_csv(file.path()).unwrap();

    assert!(dataset.dataframe().column("product_id").is_ok());
}

#[test]
fn unparseable_rating_is_missing_but_row_still_counts() {
    let file = sample_export();
    let dataset = DataLoader::default().load_csv(file.path()).unwrap();
    let df = dataset.dataframe();

    let charger = &dataset.records().unwrap()[1];
    assert_eq!(charger.rating, None);
    assert_eq!(charger.estimated_sales, Some(199.0 * 43994.0));

    let metrics = StatsCalculator::headline_metrics(df).unwrap();
    let expected_rating = (4.2 + 3.9 + 4.1 + 4.0) / 4.0;
    assert!((metrics.average_rating.unwrap() - expected_rating).abs() < 1e-9);
    assert_eq!(
        metrics.total_reviews,
        24269.0 + 43994.0 + 7928.0 + 1234.0
    );

    // still part of the Electronics sales slice
    let electronics = StatsCalculator::sales_by_category(df)
        .unwrap()
        .into_iter()
        .find(|g| g.label() == "Electronics")
        .unwrap();
    assert_eq!(electronics.estimated_sales, 26_671_631.0 + 199.0 * 43994.0);

    // but not part of the scatter set
    let points = StatsCalculator::scatter_points(df, ScatterFilter::default()).unwrap();
    assert!(points.iter().all(|p| p.product_name != "Ambrane 60W Charger"));
}

#[test]
fn blank_rating_count_leaves_sales_missing() {
    let file = sample_export();
    let dataset = DataLoader::default().load_csv(file.path()).unwrap();

    let fan = &dataset.records().unwrap()[4];
    assert_eq!(fan.rating_count, None);
    assert_eq!(fan.estimated_sales, None);
}

#[test]
fn summary_partitions_sales_and_filters_scatter() {
    let file = sample_export();
    let dataset = DataLoader::default().load_csv(file.path()).unwrap();
    let summary = DashboardSummary::compute(&dataset, ScatterFilter::default()).unwrap();

    let grouped: f64 = summary
        .sales_by_category
        .iter()
        .map(|g| g.estimated_sales)
        .sum();
    assert!((grouped - summary.metrics.total_estimated_sales).abs() < 1e-6);

    let names: Vec<&str> = summary
        .scatter
        .iter()
        .map(|p| p.product_name.as_str())
        .collect();
    // kettle is at 19%, fan has no sales, charger has no rating
    assert_eq!(
        names,
        vec!["Wayona Nylon Braided USB-C Cable", "Sounce Fast Phone Charging Cable"]
    );
    assert!(summary.trend.is_some());
}

#[test]
fn missing_column_is_fatal() {
    let file = write_csv(
        "product_name,category,discounted_price,actual_price,discount_percentage,rating",
        &["Cable,Electronics,₹10,₹20,50%,4.0"],
    );

    let err = DataLoader::default().load_csv(file.path()).unwrap_err();
    match err {
        LoaderError::MissingColumn(column) => assert_eq!(column, "rating_count"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_price_is_fatal_with_context() {
    let file = write_csv(
        HEADER,
        &[
            r#"A,Cable,Electronics,₹10,₹20,50%,4.0,5"#,
            r#"B,Charger,Electronics,₹ten,₹20,50%,4.0,5"#,
        ],
    );

    let err = DataLoader::default().load_csv(file.path()).unwrap_err();
    match err {
        LoaderError::MalformedInput { column, row, value } => {
            assert_eq!(column, "discounted_price");
            assert_eq!(row, 2);
            assert_eq!(value, "₹ten");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_percentage_is_fatal() {
    let file = write_csv(HEADER, &[r#"A,Cable,Electronics,₹10,₹20,half,4.0,5"#]);

    let err = DataLoader::default().load_csv(file.path()).unwrap_err();
    assert!(matches!(err, LoaderError::MalformedInput { ref column, .. } if column == "discount_percentage"));
}

#[test]
fn bare_currency_symbol_is_fatal() {
    let file = write_csv(
        HEADER,
        &[
            r#"A,Cable,Electronics,₹10,₹20,50%,4.0,5"#,
            r#"B,Charger,Electronics,₹,₹20,50%,4.0,5"#,
        ],
    );

    let err = DataLoader::default().load_csv(file.path()).unwrap_err();
    match err {
        LoaderError::MalformedInput { column, row, value } => {
            assert_eq!(column, "discounted_price");
            assert_eq!(row, 2);
            assert_eq!(value, "₹");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = DataLoader::default()
        .load_csv(&dir.path().join("amazon.csv"))
        .unwrap_err();

    assert!(matches!(err, LoaderError::NotFound(_)));
}

#[test]
fn currency_symbol_is_configurable() {
    let file = write_csv(HEADER, &[r#"A,Cable,Electronics,"$1,250.50",$2000,37%,4.5,"1,000""#]);
    let options = NormalizeOptions {
        currency_symbol: "$".to_string(),
        thousands_separator: ",".to_string(),
    };

    let dataset = DataLoader::new(options).load_csv(file.path()).unwrap();
    let record = &dataset.records().unwrap()[0];

    assert_eq!(record.discounted_price, Some(1250.5));
    assert_eq!(record.actual_price, Some(2000.0));
    assert_eq!(record.estimated_sales, Some(1_250_500.0));
}
