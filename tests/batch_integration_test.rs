use anyhow::Result;
use custom_tax_udf::config::cli::LocalStorage;
use custom_tax_udf::core::Pipeline;
use custom_tax_udf::utils::validation::Validate;
use custom_tax_udf::{CustomTax, EtlEngine, TaxError, TaxPipeline, TomlConfig};
use tempfile::TempDir;

const ORDERS: &str = "\
order_id,location,amount
1,USA,120.00
2,eu,80.50
3,Canada,42.00
4,,15.00
5,Japan,99.99
6,uk,10.00
";

#[tokio::test]
async fn test_end_to_end_job_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    tokio::fs::write(temp_dir.path().join("orders.csv"), ORDERS).await?;

    let config_content = r#"
[job]
name = "orders-tax"

[input]
path = "orders.csv"

[output]
path = "out"
file = "orders_taxed.csv"
"#;
    let config_path = temp_dir.path().join("job.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;

    let storage = LocalStorage::new(temp_dir.path());
    let engine = EtlEngine::new(TaxPipeline::new(storage, config, CustomTax::new()));
    let output_path = engine.run().await?;

    assert!(output_path.ends_with("orders_taxed.csv"));

    let written = tokio::fs::read_to_string(temp_dir.path().join(&output_path)).await?;
    assert_eq!(
        written,
        "\
order_id,location,amount,tax_rate
1,USA,120.00,10
2,eu,80.50,5
3,Canada,42.00,8
4,,15.00,0
5,Japan,99.99,0
6,uk,10.00,7
"
    );

    Ok(())
}

#[tokio::test]
async fn test_transform_counts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    tokio::fs::write(temp_dir.path().join("orders.csv"), ORDERS).await?;

    let config = TomlConfig::from_toml_str(
        r#"
[job]
name = "counts"

[input]
path = "orders.csv"

[output]
path = "out"
"#,
    )?;

    let pipeline = TaxPipeline::new(LocalStorage::new(temp_dir.path()), config, CustomTax::new());
    let table = pipeline.extract().await?;
    let result = pipeline.transform(table).await?;

    assert_eq!(result.processed, 6);
    assert_eq!(result.matched, 4);
    assert_eq!(result.defaulted, 2);

    Ok(())
}

#[tokio::test]
async fn test_missing_location_column_fails_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    tokio::fs::write(temp_dir.path().join("orders.csv"), "id,country\n1,USA\n").await?;

    let config = TomlConfig::from_toml_str(
        r#"
[job]
name = "missing-column"

[input]
path = "orders.csv"

[output]
path = "out"
"#,
    )?;

    let engine = EtlEngine::new(TaxPipeline::new(
        LocalStorage::new(temp_dir.path()),
        config,
        CustomTax::new(),
    ));

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, TaxError::ProcessingError { .. }));
    assert!(!temp_dir.path().join("out").exists());

    Ok(())
}

#[tokio::test]
async fn test_missing_input_file() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let config = TomlConfig::from_toml_str(
        r#"
[job]
name = "no-input"

[input]
path = "does_not_exist.csv"

[output]
path = "out"
"#,
    )?;

    let engine = EtlEngine::new(TaxPipeline::new(
        LocalStorage::new(temp_dir.path()),
        config,
        CustomTax::new(),
    ));

    assert!(matches!(engine.run().await, Err(TaxError::IoError(_))));

    Ok(())
}
