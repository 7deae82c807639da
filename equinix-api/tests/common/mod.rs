//! 共享测试工具和辅助函数

#![allow(dead_code)]

use equinix_api::{ClientConfig, EquinixClient};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 从环境变量构建客户端
pub fn client_from_env() -> Option<EquinixClient> {
    let config = ClientConfig::from_env().ok()?;
    EquinixClient::new(config).ok()
}

/// 生成唯一的测试资源名称
pub fn generate_test_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("tf-test-{}", &uuid.to_string()[..8])
}

/// 测试用 ed25519 公钥
pub const TEST_PUBLIC_KEY: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIH8b8ZpM5q9Ql1o8pWcWkE0m6n2b9G2kGvG7WQn3yK0x test@example";
