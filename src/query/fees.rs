//! Fee computation and injection for operation batches.

use serde_json::{json, Value};

use crate::error::{GatewayError, GatewayResult};
use crate::query::facade::QueryFacade;
use crate::query::types::Operation;

/// Attaches node-computed fees to a batch of prepared operations.
///
/// Operations carry no correlation id, so the pairing is positional:
/// the node guarantees the i-th fee answers the i-th operation.
#[derive(Clone)]
pub struct FeeInjector {
    facade: QueryFacade,
}

impl FeeInjector {
    pub fn new(facade: QueryFacade) -> Self {
        Self { facade }
    }

    /// Compute and attach a fee to every operation in the batch.
    ///
    /// Estimation is requested on fee-less payloads; any pre-existing
    /// `fee` field is stripped from the copy sent to the node. The output
    /// has the same length and order as the input. A fee list of any
    /// other length is a contract violation from the node and fails the
    /// whole batch; nothing is mutated in that case.
    pub async fn inject_fees(&self, operations: Vec<Operation>) -> GatewayResult<Vec<Operation>> {
        if operations.iter().any(|op| !op.op.is_object()) {
            return Err(GatewayError::InvalidInput(
                "operation payload must be a JSON object".to_string(),
            ));
        }

        let batch: Vec<Value> = operations
            .iter()
            .map(|operation| {
                let mut payload = operation.op.clone();
                if let Some(fields) = payload.as_object_mut() {
                    fields.remove("fee");
                }
                json!([operation.code, payload])
            })
            .collect();

        let fees = self.facade.required_fees(&batch).await?;
        if fees.len() != operations.len() {
            return Err(GatewayError::SizeMismatch {
                operations: operations.len(),
                fees: fees.len(),
            });
        }

        let mut operations = operations;
        for (operation, fee) in operations.iter_mut().zip(fees) {
            if let Some(fields) = operation.op.as_object_mut() {
                fields.insert("fee".to_string(), fee);
            }
        }
        Ok(operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubNode, StubReply};
    use std::sync::Arc;

    fn transfer(n: u64) -> Operation {
        Operation {
            code: 0,
            op: json!({"from": format!("1.2.{}", n), "to": "1.2.99", "amount": n * 10}),
        }
    }

    fn fee_node(fee_count: usize) -> Arc<StubNode> {
        Arc::new(StubNode::new(move |method, params| match method {
            "get_required_fees" => {
                // Estimation payloads must arrive fee-less
                for entry in params[0].as_array().unwrap() {
                    assert!(entry[1].get("fee").is_none());
                }
                StubReply::Reply(Value::Array(
                    (0..fee_count)
                        .map(|i| json!({"amount": (i + 1) * 7, "asset_id": "1.3.0"}))
                        .collect(),
                ))
            }
            _ => StubReply::Fail("unexpected".to_string()),
        }))
    }

    #[tokio::test]
    async fn test_fees_attach_positionally() {
        let injector = FeeInjector::new(QueryFacade::new(fee_node(3)));
        let operations = vec![transfer(1), transfer(2), transfer(3)];

        let with_fees = injector.inject_fees(operations).await.unwrap();

        assert_eq!(with_fees.len(), 3);
        for (i, operation) in with_fees.iter().enumerate() {
            assert_eq!(operation.op["fee"]["amount"], ((i + 1) * 7) as u64);
            assert_eq!(operation.op["from"], format!("1.2.{}", i + 1));
        }
    }

    #[tokio::test]
    async fn test_stale_fee_is_stripped_before_estimation() {
        let injector = FeeInjector::new(QueryFacade::new(fee_node(1)));
        let mut operation = transfer(1);
        operation.op["fee"] = json!({"amount": 999999, "asset_id": "1.3.0"});

        let with_fees = injector.inject_fees(vec![operation]).await.unwrap();
        assert_eq!(with_fees[0].op["fee"]["amount"], 7);
    }

    #[tokio::test]
    async fn test_short_fee_list_is_size_mismatch() {
        let injector = FeeInjector::new(QueryFacade::new(fee_node(2)));

        let err = injector
            .inject_fees(vec![transfer(1), transfer(2), transfer(3)])
            .await
            .unwrap_err();

        match err {
            GatewayError::SizeMismatch { operations, fees } => {
                assert_eq!(operations, 3);
                assert_eq!(fees, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_object_payload_rejected_before_remote_call() {
        let node = fee_node(1);
        let injector = FeeInjector::new(QueryFacade::new(node.clone()));
        let bad = Operation {
            code: 0,
            op: json!("not an object"),
        };

        let err = injector.inject_fees(vec![bad]).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
        assert_eq!(node.total_calls(), 0);
    }
}
