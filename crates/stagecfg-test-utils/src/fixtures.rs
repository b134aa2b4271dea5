//! Plain-data project fixtures.

use serde_json::{Value, json};

/// A project with one component, two stages and the bucket override chain
/// `global` (project) < `prod-default` (stage) < `prod-east` (region).
pub fn billing_project() -> Value {
    json!({
        "name": "billing",
        "version": "1.2.0",
        "location": "https://github.com/acme/billing",
        "author": "Platform Team",
        "description": "Invoices and payments",
        "custom": {"alerts": {"email": "oncall@example.com"}},
        "plugins": ["warmup"],
        "components": {
            "payments": {
                "name": "payments",
                "runtime": "nodejs4.3",
                "functions": {
                    "charge": {
                        "name": "charge",
                        "handler": "charge/handler.handler",
                        "timeout": "${TIMEOUT}",
                        "environment": "$${functionEnv}",
                        "endpoints": [
                            {"path": "charges", "method": "POST", "authorizationType": "AWS_IAM"},
                            {"path": "charges", "method": "GET"}
                        ],
                        "events": [
                            {"name": "settle", "type": "schedule", "config": {"schedule": "rate(1 hour)"}}
                        ]
                    },
                    "refund": {
                        "name": "refund",
                        "handler": "refund/handler.handler",
                        "endpoints": [{"path": "refunds", "method": "POST"}],
                        "events": []
                    }
                }
            }
        },
        "stages": {
            "prod": {
                "name": "prod",
                "variables": {"bucket": "prod-default", "TIMEOUT": 30},
                "regions": {
                    "us-east-1": {"name": "us-east-1", "variables": {"bucket": "prod-east"}},
                    "eu-west-1": {"name": "eu-west-1", "variables": {}}
                }
            },
            "dev": {
                "name": "dev",
                "variables": {"TIMEOUT": 6},
                "regions": {"us-east-1": {"name": "us-east-1", "variables": {}}}
            }
        },
        "resources": {
            "defaultResources": {
                "name": "defaultResources",
                "AWSTemplateFormatVersion": "2010-09-09",
                "Resources": {"Bucket": {"Type": "AWS::S3::Bucket", "BucketName": "${bucket}"}}
            }
        },
        "variables": {"bucket": "global", "project": "billing"},
        "templates": {
            "functionEnv": {"BUCKET": "${bucket}", "STAGE": "${stage}", "TAGS": "$${tags}"},
            "tags": {"project": "${project}", "region": "${region}"}
        }
    })
}

/// A minimal project without stages.
pub fn empty_project(name: &str) -> Value {
    json!({ "name": name })
}
