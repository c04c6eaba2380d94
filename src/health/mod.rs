//! 健康检测模块
//!
//! 提供连通性预检、单端点HTTP检测、并发派发与结果汇总功能

pub mod checker;
pub mod coordinator;
pub mod endpoint;
pub mod probe;
pub mod result;

// 重新导出主要类型
pub use checker::{is_healthy_status, EndpointChecker, HttpEndpointChecker};
pub use coordinator::Coordinator;
pub use endpoint::{Endpoint, EndpointSet};
pub use probe::{ConnectivityProbe, HttpConnectivityProbe};
pub use result::{CheckResult, OutcomeBuilder, RunOutcome};
