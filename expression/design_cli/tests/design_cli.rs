#[macro_use]
extern crate util;

pub mod common;

use std::fs::read_to_string;

use assert_cmd::Command;
use indoc::indoc;
use predicates::prelude::*;
use util::test::{prepare_args, print};

use crate::common::{path_str, Context};

const DESIGN: &str = indoc! {"
    #$Age : Category=age Type=Continuous
    #$Treatment : Category=treatment Type=Categorical
    Bioassay\tAge\tTreatment
    f-aa\t50\tcontrol
    f-ab\t62\tCONTROL
"};

fn create(ctx: &Context) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));
    let args = prepare_args(vec![
        ctx.path_arg.as_str(),
        ctx.experiment_arg.as_str(),
        "create",
        "--name Example",
        ctx.samples_arg().as_str(),
    ]);

    cmd.args(args)
        .assert()
        .success()
        .stderr(print("stderr"))
        .stdout(print("stdout"));
}

#[test]
fn create_experiment() -> Result<(), anyhow::Error> {
    // given
    let ctx = Context::new();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));

    // and
    let args = prepare_args(vec![
        ctx.trace_log_arg.as_str(),
        ctx.path_arg.as_str(),
        ctx.experiment_arg.as_str(),
        "-vvv",
        "create",
        "--name Example",
        ctx.samples_arg().as_str(),
    ]);
    println!("args: {:?}", args);

    // when
    cmd.args(args)
        // then
        .assert()
        .success()
        .stderr(print("stderr"))
        .stdout(print("stdout"));

    // and
    let trace_content: String = read_to_string(&ctx.test_trace_log_path)?;
    println!("{}", trace_content);

    assert_contains_inorder!(trace_content, [
        "Loading sample sheet.",
        "Added sample. name: 'f-aa', id: BM1",
        "Added sample. name: 'f-ab', id: BM2",
        "Created experiment. short_name: GSE1, bio_materials: 2, bio_assays: 2",
    ]);

    // and
    let experiment_content = read_to_string(&ctx.test_experiment_path)?;
    assert!(experiment_content.contains("\"short_name\": \"GSE1\""));

    Ok(())
}

#[test]
fn create_existing_experiment_fails() -> Result<(), anyhow::Error> {
    // given
    let ctx = Context::new();
    create(&ctx);
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));

    // and
    let args = prepare_args(vec![
        ctx.path_arg.as_str(),
        ctx.experiment_arg.as_str(),
        "create",
        "--name Example",
        ctx.samples_arg().as_str(),
    ]);

    // when
    cmd.args(args)
        // then
        .assert()
        .failure()
        .stderr(print("stderr").and(predicate::str::contains("Experiment already exists.")));

    Ok(())
}

#[test]
fn import_design() -> Result<(), anyhow::Error> {
    // given
    let ctx = Context::new();
    create(&ctx);
    let design_path = ctx.write_file("design.txt", DESIGN);
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));

    // and
    let file_arg = format!("--file {}", path_str(&design_path));
    let args = prepare_args(vec![
        ctx.trace_log_arg.as_str(),
        ctx.path_arg.as_str(),
        ctx.experiment_arg.as_str(),
        "-vvv",
        "import-design",
        file_arg.as_str(),
        ctx.vocabulary_arg().as_str(),
    ]);
    println!("args: {:?}", args);

    // when
    cmd.args(args)
        // then
        .assert()
        .success()
        .stderr(print("stderr"))
        .stdout(print("stdout"));

    // and
    let trace_content: String = read_to_string(&ctx.test_trace_log_path)?;
    println!("{}", trace_content);

    assert!(trace_content.contains("Loaded vocabulary."));
    assert_contains_inorder!(trace_content, [
        "Import stage: Parsing",
        "Import stage: Validating",
        "Import stage: BuildingFactors",
        "Added factor. name: 'Age'",
        "Added factor. name: 'Treatment'",
        "Import stage: BindingValues",
        "Import stage: Persisting",
        "Persisted design. experiment: 'GSE1', factor_values: 3, bio_materials: 2",
        "Imported design successfully.",
    ]);

    // and
    let experiment_content = read_to_string(&ctx.test_experiment_path)?;
    assert!(experiment_content.contains("\"Age\""));
    assert!(experiment_content.contains("\"http://www.ebi.ac.uk/efo/EFO_0000727\""));

    Ok(())
}

#[test]
fn import_design_dry_run_saves_nothing() -> Result<(), anyhow::Error> {
    // given
    let ctx = Context::new();
    create(&ctx);
    let design_path = ctx.write_file("design.txt", DESIGN);
    let original_content = read_to_string(&ctx.test_experiment_path)?;
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));

    // and
    let file_arg = format!("--file {}", path_str(&design_path));
    let args = prepare_args(vec![
        ctx.trace_log_arg.as_str(),
        ctx.path_arg.as_str(),
        ctx.experiment_arg.as_str(),
        "import-design",
        file_arg.as_str(),
        ctx.vocabulary_arg().as_str(),
        "--dry-run",
    ]);

    // when
    cmd.args(args)
        // then
        .assert()
        .success()
        .stderr(print("stderr"))
        .stdout(print("stdout"));

    // and
    let trace_content: String = read_to_string(&ctx.test_trace_log_path)?;
    assert_contains_inorder!(trace_content, [
        "Import stage: BindingValues",
        "Import stage: DryRunComplete",
        "Dry run complete, nothing was saved.",
    ]);
    assert!(!trace_content.contains("Persisted design."));

    // and
    assert_eq!(read_to_string(&ctx.test_experiment_path)?, original_content);

    Ok(())
}

#[test]
fn import_design_with_unknown_sample_fails() -> Result<(), anyhow::Error> {
    // given
    let ctx = Context::new();
    create(&ctx);
    let design_path = ctx.write_file("design.txt", indoc! {"
        #$Age : Category=age Type=Continuous
        Bioassay\tAge
        f-zz\t50
    "});
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));

    // and
    let file_arg = format!("--file {}", path_str(&design_path));
    let args = prepare_args(vec![
        ctx.path_arg.as_str(),
        ctx.experiment_arg.as_str(),
        "import-design",
        file_arg.as_str(),
        ctx.vocabulary_arg().as_str(),
    ]);

    // when
    cmd.args(args)
        // then
        .assert()
        .failure()
        .stderr(
            print("stderr").and(predicate::str::contains(
                "No sample in the experiment matches. line: 3, sample: 'f-zz'",
            )),
        );

    Ok(())
}

#[test]
fn import_design_with_unknown_category_fails() -> Result<(), anyhow::Error> {
    // given
    let ctx = Context::new();
    create(&ctx);
    let design_path = ctx.write_file("design.txt", indoc! {"
        #$Diet : Category=diet Type=Categorical
        Bioassay\tDiet
        f-aa\tchow
    "});
    let original_content = read_to_string(&ctx.test_experiment_path)?;
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));

    // and
    let file_arg = format!("--file {}", path_str(&design_path));
    let args = prepare_args(vec![
        ctx.path_arg.as_str(),
        ctx.experiment_arg.as_str(),
        "import-design",
        file_arg.as_str(),
        ctx.vocabulary_arg().as_str(),
    ]);

    // when
    cmd.args(args)
        // then
        .assert()
        .failure()
        .stderr(print("stderr").and(predicate::str::contains("category: 'diet'")));

    // and
    assert_eq!(read_to_string(&ctx.test_experiment_path)?, original_content);

    Ok(())
}

#[test]
fn export_design_after_import() -> Result<(), anyhow::Error> {
    // given
    let ctx = Context::new();
    create(&ctx);
    let design_path = ctx.write_file("design.txt", DESIGN);
    let file_arg = format!("--file {}", path_str(&design_path));
    Command::new(env!("CARGO_BIN_EXE_design_cli"))
        .args(prepare_args(vec![
            ctx.path_arg.as_str(),
            ctx.experiment_arg.as_str(),
            "import-design",
            file_arg.as_str(),
            ctx.vocabulary_arg().as_str(),
        ]))
        .assert()
        .success();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));

    // and
    let args = prepare_args(vec![
        ctx.path_arg.as_str(),
        ctx.experiment_arg.as_str(),
        "export-design",
        "--output exported.txt",
    ]);

    // when
    cmd.args(args)
        // then
        .assert()
        .success()
        .stderr(print("stderr"))
        .stdout(print("stdout"));

    // and
    let exported_path = ctx.temp_dir.path().join("exported.txt");
    assert_eq!(read_to_string(exported_path)?, indoc! {"
        #$Age : Category=age Type=Continuous
        #$Treatment : Category=treatment Type=Categorical
        Bioassay\tExternalID\tAge\tTreatment
        f_aa___GSM1\tGSM1\t50\tcontrol
        f_ab___GSM2\tGSM2\t62\tcontrol
    "});

    Ok(())
}

#[test]
fn show_after_import() -> Result<(), anyhow::Error> {
    // given
    let ctx = Context::new();
    create(&ctx);
    let design_path = ctx.write_file("design.txt", DESIGN);
    let file_arg = format!("--file {}", path_str(&design_path));
    Command::new(env!("CARGO_BIN_EXE_design_cli"))
        .args(prepare_args(vec![
            ctx.path_arg.as_str(),
            ctx.experiment_arg.as_str(),
            "import-design",
            file_arg.as_str(),
            ctx.vocabulary_arg().as_str(),
        ]))
        .assert()
        .success();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));

    // and
    let args = prepare_args(vec![ctx.path_arg.as_str(), ctx.experiment_arg.as_str(), "-q", "show"]);

    // when
    cmd.args(args)
        // then
        .assert()
        .success()
        .stderr(print("stderr"))
        .stdout(print("stdout").and(predicate::str::contains(indoc! {"
            Sample: f-ab (f_ab___GSM2)
              Age: 62
              Treatment: control
        "})));

    Ok(())
}

#[test]
fn args_from_file() -> Result<(), anyhow::Error> {
    // given
    let ctx = Context::new();
    let args_path = ctx.write_file(
        "create.args",
        &format!(
            "{}\n{}\ncreate\n--name\nExample\n--samples\n{}\n",
            ctx.path_arg.replace(' ', "\n"),
            ctx.experiment_arg.replace(' ', "\n"),
            path_str(&ctx.samples_path)
        ),
    );
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_design_cli"));

    // when
    cmd.arg(format!("@{}", path_str(&args_path)))
        // then
        .assert()
        .success()
        .stderr(print("stderr"))
        .stdout(print("stdout"));

    // and
    assert!(ctx.test_experiment_path.exists());

    Ok(())
}
