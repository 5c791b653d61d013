//! 日志脱敏
//!
//! 上游请求的错误信息可能包含管理员令牌或查询参数中的凭据，写日志前先清理

/// 需要脱敏的 `key=value` 形式的键
const SENSITIVE_KEYS: [&str; 4] = ["password=", "api_key=", "token=", "admin_session="];

/// 值的结束符
const VALUE_TERMINATORS: [char; 6] = ['&', ' ', '\n', '\r', '\t', ';'];

const MASK: &str = "********";

/// 清理日志消息，把令牌、密码等替换为星号
///
/// 处理 `password=`、`api_key=`、`token=`、`admin_session=` 形式的参数，
/// 以及 `Bearer <token>` 形式的授权头
pub fn sanitize_log_message(message: &str) -> String {
    let mut sanitized = message.to_string();

    for key in SENSITIVE_KEYS {
        sanitized = mask_after(&sanitized, key, &VALUE_TERMINATORS);
    }

    mask_after(&sanitized, "Bearer ", &[' ', '\n', '\r', '\t', '"', '\''])
}

/// 把每个 marker 之后、终止符之前的内容替换为掩码
fn mask_after(input: &str, marker: &str, terminators: &[char]) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(index) = rest.find(marker) {
        let start = index + marker.len();
        output.push_str(&rest[..start]);

        let value = &rest[start..];
        let end = value.find(terminators).unwrap_or(value.len());
        if end > 0 {
            output.push_str(MASK);
        }
        rest = &value[end..];
    }

    output.push_str(rest);
    output
}
