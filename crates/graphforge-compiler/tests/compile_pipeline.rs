//! End-to-end compile / persist / reload pipeline against file storage.

use std::sync::Arc;

use graphforge_compiler::{
    CompilerConfig, PluginRequest, SchemaCompiler, SchemaConfiguration,
};
use graphforge_model::{FieldDef, ModelBinding, NativeField, TypeDef, TypeReference};
use graphforge_storage::{FileStorage, SchemaStorage, StorageError};

fn shop_configuration() -> SchemaConfiguration {
    let mut product = TypeDef::object("Product");
    product
        .push_field(FieldDef::new("id", TypeReference::required("ID")))
        .unwrap();
    product
        .push_field(FieldDef::new("name", TypeReference::required("String")))
        .unwrap();
    product
        .push_field(FieldDef::new("category", TypeReference::named("Category")))
        .unwrap();

    let mut category = TypeDef::object("Category");
    category
        .push_field(FieldDef::new("id", TypeReference::required("ID")))
        .unwrap();
    category
        .push_field(FieldDef::new("label", TypeReference::named("String")))
        .unwrap();
    category
        .push_field(FieldDef::new("products", TypeReference::list("Product")))
        .unwrap();

    SchemaConfiguration::new("shop")
        .with_type(product)
        .with_type(category)
        .with_binding(
            ModelBinding::new("Product", "shop.Product")
                .with_field(NativeField::scalar("name").filterable().sortable())
                .with_field(NativeField::relation("category", "Category").filterable()),
        )
        .with_binding(
            ModelBinding::new("Category", "shop.Category")
                .with_field(NativeField::scalar("label").filterable()),
        )
        .expose("Product")
        .expose("Category")
        .with_plugins(
            "Product",
            [PluginRequest::new("filter"), PluginRequest::new("order")],
        )
}

#[tokio::test]
async fn compile_persist_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.schema.json");
    let storage = FileStorage::new(&path);
    let compiler = SchemaCompiler::new(CompilerConfig::default());
    let configuration = shop_configuration();

    assert!(!storage.exists().await);
    let compiled = compiler
        .ensure_compiled(&configuration, &storage)
        .await
        .unwrap();
    assert!(storage.exists().await);
    assert!(compiled.graph().contains("ProductFilterInput"));
    assert!(compiled.graph().contains("CategoryFilterInput"));

    // A second call loads the artifact instead of recompiling.
    let reloaded = compiler
        .ensure_compiled(&configuration, &storage)
        .await
        .unwrap();
    assert_eq!(reloaded, compiled);
}

#[tokio::test]
async fn nested_filter_input_crosses_relations() {
    let compiler = SchemaCompiler::new(CompilerConfig::default());
    let compiled = compiler.compile(&shop_configuration()).unwrap();

    let product_input = compiled.graph().get("ProductFilterInput").unwrap();
    assert_eq!(
        product_input.field("category").unwrap().type_ref.base(),
        "CategoryFilterInput"
    );
    let category_input = compiled.graph().get("CategoryFilterInput").unwrap();
    assert!(category_input.field("label__contains").is_some());
}

#[tokio::test]
async fn corrupt_artifact_falls_back_to_recompilation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.schema.json");
    tokio::fs::write(&path, b"{ not json").await.unwrap();

    let storage = FileStorage::new(&path);
    assert!(storage.exists().await);
    assert!(matches!(
        storage.load().await.unwrap_err(),
        StorageError::CorruptArtifact(_)
    ));

    let compiler = SchemaCompiler::new(CompilerConfig::default());
    let compiled = compiler
        .ensure_compiled(&shop_configuration(), &storage)
        .await
        .unwrap();
    assert_eq!(compiled.schema_key(), "shop");

    // The recompile overwrote the corrupt artifact.
    let reloaded = storage.load().await.unwrap();
    assert_eq!(reloaded.schema_key, "shop");
}

#[tokio::test]
async fn persisted_bytes_are_reproducible() {
    let compiler = SchemaCompiler::new(CompilerConfig::default());
    let configuration = shop_configuration();

    let dir = tempfile::tempdir().unwrap();
    let mut payloads = Vec::new();
    for name in ["a.json", "b.json"] {
        let path = dir.path().join(name);
        let storage = FileStorage::new(&path);
        compiler
            .ensure_compiled(&configuration, &storage)
            .await
            .unwrap();
        payloads.push(tokio::fs::read(&path).await.unwrap());
    }
    assert_eq!(payloads[0], payloads[1]);
}
