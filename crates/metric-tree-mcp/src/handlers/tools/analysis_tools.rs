//! Elasticity estimation and metric ideation handlers.

use metric_tree_core::elasticity::estimate;
use metric_tree_core::ideate::ideate;
use serde_json::json;
use tracing::{error, info};

use crate::protocol::{JsonRpcId, JsonRpcResponse};

use super::super::Handlers;
use super::analysis_dtos::{ElasticitiesRequest, IdeateRequest};

impl Handlers {
    pub(crate) fn call_elasticities_estimate(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: ElasticitiesRequest =
            match self.parse_request(id.clone(), args, "elasticities_estimate") {
                Ok(r) => r,
                Err(resp) => return resp,
            };

        match estimate(&request.parent, &request.children, request.options()) {
            Ok(output) => {
                info!(
                    n = output.n,
                    children = output.weights.len(),
                    r2 = output.r2,
                    "elasticities_estimate: done"
                );
                self.tool_result(id, output)
            }
            Err(e) => {
                error!(error = %e, "elasticities_estimate: FAILED");
                self.tool_error(id, &e.client_message())
            }
        }
    }

    pub(crate) fn call_ideate_metrics(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: IdeateRequest = match self.parse_request(id.clone(), args, "ideate_metrics") {
            Ok(r) => r,
            Err(resp) => return resp,
        };
        let stage = match request.stage() {
            Ok(s) => s,
            Err(e) => return self.tool_error(id, &e),
        };

        let ideas = ideate(
            request.industry.as_deref(),
            stage,
            request.count,
            request.diversity,
        );
        info!(count = ideas.len(), diversity = request.diversity, "ideate_metrics: done");
        self.tool_result(id, json!({ "ideas": ideas }))
    }
}
