//! Deploy rule: expands a `deploy` declaration into terraform and ECR steps

use crate::chain::{Convert, Outcome, Participant};
use crate::core::record::{mapping, sequence};
use crate::core::secret::{declaration, from_secret};
use crate::core::{DeploySpec, Document, Open, Step, StepFields};
use crate::plugin::{Config, ConvertRequest, PluginContext};
use async_trait::async_trait;
use serde_yaml::Value;

pub const NAME: &str = "deploy";

pub const DEFAULT_TERRAFORM_IMAGE: &str = "gracepoint/terraform:0.0.4";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Image that builds and pushes to ECR
pub const PUBLISH_IMAGE: &str = "andrewstucki/plugin-drone-ecr:1";

const DOCKER_SOCKET: &str = "/var/run/docker.sock";
const ACCESS_KEY_SECRET: &str = "deploy_access_key";
const SECRET_KEY_SECRET: &str = "deploy_secret_key";

/// Appends init, publish and deploy steps to pipelines that declare `deploy`
#[derive(Debug, Clone, Copy, Default)]
pub struct DeployRule;

impl DeployRule {
    pub fn new() -> Self {
        Self
    }
}

/// Tag of the image a deploy declaration publishes
pub fn image_for(spec: &DeploySpec) -> String {
    format!("{}/{}:$DRONE_COMMIT", spec.registry, spec.repo)
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Replace a pipeline's deploy declaration with explicit steps
///
/// Returns whether the document changed.
pub fn update(document: &mut Document) -> bool {
    if !document.is_pipeline() {
        return false;
    }
    let Some(spec) = document.deploy.take() else {
        return false;
    };

    let terraform = or_default(&spec.terraform, DEFAULT_TERRAFORM_IMAGE);
    let region = or_default(&spec.region, DEFAULT_REGION);
    let image = image_for(&spec);

    document.steps.push(terraform_step(
        "initialize terraform and ecr",
        terraform,
        [
            "decrypt terraform.tfvars.encrypted > terraform.tfvars".to_string(),
            "terraform init".to_string(),
            format!("terraform apply -auto-approve -target aws_ecr_repository.repo -var image={image}"),
        ],
        None,
    ));
    document.steps.push(publish_step(&spec.repo));
    document.steps.push(terraform_step(
        "deploy",
        terraform,
        [
            format!("terraform apply -auto-approve -var image={image}"),
            format!("wait-for-ecs `terraform output cluster` {image}"),
        ],
        Some(region),
    ));

    document.volumes.push(mapping([
        ("name", Value::from("docker")),
        ("host", mapping([("path", Value::from(DOCKER_SOCKET))])),
    ]));

    true
}

fn terraform_step<const N: usize>(
    name: &str,
    image: &str,
    commands: [String; N],
    region: Option<&str>,
) -> Step {
    let mut environment = vec![
        ("AWS_ACCESS_KEY_ID", from_secret(ACCESS_KEY_SECRET)),
        ("AWS_SECRET_ACCESS_KEY", from_secret(SECRET_KEY_SECRET)),
    ];
    if let Some(region) = region {
        environment.push(("AWS_REGION", Value::from(region)));
    }

    Open::new(StepFields::default())
        .with_attr("name", name)
        .with_attr("image", image)
        .with_attr("commands", sequence(commands))
        .with_attr("environment", mapping(environment))
}

fn publish_step(repo: &str) -> Step {
    Open::new(StepFields::default())
        .with_attr("name", "publish")
        .with_attr("image", PUBLISH_IMAGE)
        .with_attr(
            "volumes",
            Value::Sequence(vec![mapping([
                ("name", Value::from("docker")),
                ("path", Value::from(DOCKER_SOCKET)),
            ])]),
        )
        .with_attr(
            "settings",
            mapping([
                ("auto_tag", Value::Bool(true)),
                ("repo", Value::from(repo)),
                ("access_key", from_secret(ACCESS_KEY_SECRET)),
                ("secret_key", from_secret(SECRET_KEY_SECRET)),
            ]),
        )
}

/// Declare the AWS credentials the deploy steps reference
///
/// Appended whether or not any pipeline deploys.
pub fn append_secrets(documents: &mut Vec<Document>) {
    documents.extend([
        declaration(ACCESS_KEY_SECRET, "deploy-access-key"),
        declaration(SECRET_KEY_SECRET, "deploy-secret-key"),
    ]);
}

#[async_trait]
impl Participant<Convert> for DeployRule {
    async fn apply(&self, cx: &PluginContext, request: &ConvertRequest) -> Outcome<Config> {
        let mut documents = match super::decode(request) {
            Ok(documents) => documents,
            Err(err) => return super::decline(NAME, cx, request, err),
        };

        for document in documents.iter_mut() {
            if update(document) {
                super::report_rewrite(NAME, cx, request, document);
            }
        }
        append_secrets(&mut documents);

        super::encode(NAME, cx, request, &documents)
    }
}
