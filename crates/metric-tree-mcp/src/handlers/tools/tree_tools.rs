//! Tree tool handlers: North Star suggestion, expansion, lint, explain,
//! propagation and forecast.

use metric_tree_core::nsm::suggest_north_star;
use metric_tree_core::playbook::{explain, ExplainRequest};
use metric_tree_core::tree::{
    expand_tree, linreg_forecast, lint_tree, numeric_expansion, propagate, symbolic_formula,
    top_contributors,
};
use serde_json::json;
use tracing::{error, info};

use crate::protocol::{JsonRpcId, JsonRpcResponse};

use super::super::Handlers;
use super::tree_dtos::{
    ExpandTreeRequest, ForecastSeriesRequest, LintTreeRequest, PropagateDeltasRequest,
    SuggestNorthStarRequest,
};

impl Handlers {
    pub(crate) fn call_suggest_north_star(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: SuggestNorthStarRequest =
            match self.parse_request(id.clone(), args, "suggest_north_star") {
                Ok(r) => r,
                Err(resp) => return resp,
            };

        let candidates = suggest_north_star(
            &request.industry,
            &request.product_type,
            request.emphasis.as_ref(),
        );
        info!(
            industry = %request.industry,
            count = candidates.len(),
            "suggest_north_star: done"
        );
        self.tool_result(id, json!({ "candidates": candidates }))
    }

    /// Expand the given North Star, or the top suggestion when none is given.
    pub(crate) fn call_expand_tree(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: ExpandTreeRequest = match self.parse_request(id.clone(), args, "expand_tree")
        {
            Ok(r) => r,
            Err(resp) => return resp,
        };

        let north_star = match request.north_star() {
            Some(ns) => ns.to_string(),
            None => {
                let candidates = suggest_north_star(
                    &request.industry,
                    &request.product_type,
                    request.emphasis.as_ref(),
                );
                match candidates.into_iter().next() {
                    Some(c) => c.name,
                    None => return self.tool_error(id, "No North Star candidate for industry"),
                }
            }
        };

        let tree = expand_tree(&north_star, &request.industry);
        info!(
            north_star = %north_star,
            nodes = tree.nodes.len(),
            "expand_tree: done"
        );
        self.tool_result(id, tree)
    }

    pub(crate) fn call_lint_tree(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: LintTreeRequest = match self.parse_request(id.clone(), args, "lint_tree") {
            Ok(r) => r,
            Err(resp) => return resp,
        };
        let warnings = lint_tree(&request.tree);
        info!(warnings = warnings.len(), "lint_tree: done");
        self.tool_result(id, json!({ "warnings": warnings }))
    }

    pub(crate) async fn call_explain(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: ExplainRequest = match self.parse_request(id.clone(), args, "explain") {
            Ok(r) => r,
            Err(resp) => return resp,
        };

        match explain(&request, Some(self.backend.as_ref())).await {
            Ok(explanation) => {
                info!(
                    node = %explanation.node,
                    stage = %explanation.stage,
                    moves = explanation.how_to_move.len(),
                    "explain: done"
                );
                self.tool_result(id, explanation)
            }
            Err(e) => {
                error!(error = %e, "explain: FAILED");
                self.tool_error(id, &e.client_message())
            }
        }
    }

    /// Propagation for every node, plus a breakdown of `focus_node` when set.
    pub(crate) fn call_propagate_deltas(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: PropagateDeltasRequest =
            match self.parse_request(id.clone(), args, "propagate_deltas") {
                Ok(r) => r,
                Err(resp) => return resp,
            };

        let tree = &request.tree;
        let weight = request.default_weight;
        let result = propagate(tree, &request.deltas, weight);

        let mut body = json!({
            "by_id": result.by_id,
            "ns_delta": result.ns_delta,
        });
        if let Some(focus) = &request.focus_node {
            body["focus"] = json!({
                "node": focus,
                "delta": result.by_id.get(focus).copied().unwrap_or(0.0),
                "formula": symbolic_formula(tree, focus, weight),
                "expansion": numeric_expansion(tree, focus, &request.deltas, weight),
                "top_contributors": top_contributors(tree, focus, &request.deltas, weight, request.top_k),
            });
        }

        info!(
            deltas = request.deltas.len(),
            ns_delta = result.ns_delta,
            focus = request.focus_node.as_deref().unwrap_or("-"),
            "propagate_deltas: done"
        );
        self.tool_result(id, body)
    }

    pub(crate) fn call_forecast_series(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: ForecastSeriesRequest =
            match self.parse_request(id.clone(), args, "forecast_series") {
                Ok(r) => r,
                Err(resp) => return resp,
            };

        match linreg_forecast(&request.series, request.horizon) {
            Ok(forecast) => {
                info!(
                    points = request.series.len(),
                    horizon = forecast.horizon,
                    slope = forecast.slope,
                    "forecast_series: done"
                );
                self.tool_result(id, forecast)
            }
            Err(e) => {
                error!(error = %e, "forecast_series: FAILED");
                self.tool_error(id, &e.client_message())
            }
        }
    }
}
