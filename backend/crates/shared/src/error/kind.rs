//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that maps to HTTP status codes.

use serde::Serialize;

/// エラー種別の列挙体
///
/// ドメイン横断のエラー分類を定義します。
/// 各バリアントは HTTP ステータスコードと機械可読なエラーコードにマッピングされます。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.status_code(), 404);
/// assert_eq!(kind.code(), "NOT_FOUND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - 入力不正（空の値、不正なカーソル、未知または期限切れのトークン）
    Validation,
    /// 404 - ID によるリソース検索が空振り
    NotFound,
    /// 409 - 一意制約との競合
    Conflict,
    /// 429 - レート制限超過
    RateLimited,
    /// 500 - 分類されない内部エラー
    Internal,
    /// 503 - 外部ベンダーが利用不可
    VendorUnavailable,
}

impl ErrorKind {
    /// HTTP ステータスコードを取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Validation.status_code(), 400);
    /// assert_eq!(ErrorKind::RateLimited.status_code(), 429);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::RateLimited => 429,
            ErrorKind::Internal => 500,
            ErrorKind::VendorUnavailable => 503,
        }
    }

    /// HTTP ステータスの標準的な理由フレーズ
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Bad Request",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::RateLimited => "Too Many Requests",
            ErrorKind::Internal => "Internal Server Error",
            ErrorKind::VendorUnavailable => "Service Unavailable",
        }
    }

    /// クライアント向けの機械可読エラーコード
    ///
    /// レスポンスボディの `code` フィールドにそのまま出力されます。
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_FAILED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::RateLimited => "RATE_LIMITED",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
            ErrorKind::VendorUnavailable => "VENDOR_UNAVAILABLE",
        }
    }

    /// サーバー側のエラーかどうかを判定
    ///
    /// 5xx系のエラーは `true` を返します。
    /// これらのエラーはログに記録すべきです。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// クライアント側のエラーかどうかを判定
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::Validation.status_code(), 400);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::RateLimited.status_code(), 429);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
        assert_eq!(ErrorKind::VendorUnavailable.status_code(), 503);
    }

    #[test]
    fn test_codes() {
        assert_eq!(ErrorKind::Validation.code(), "VALIDATION_FAILED");
        assert_eq!(ErrorKind::RateLimited.code(), "RATE_LIMITED");
        assert_eq!(ErrorKind::Internal.code(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn test_is_server_error() {
        assert!(!ErrorKind::Validation.is_server_error());
        assert!(!ErrorKind::RateLimited.is_server_error());
        assert!(ErrorKind::Internal.is_server_error());
        assert!(ErrorKind::VendorUnavailable.is_server_error());
    }

    #[test]
    fn test_is_client_error() {
        assert!(ErrorKind::Validation.is_client_error());
        assert!(ErrorKind::NotFound.is_client_error());
        assert!(!ErrorKind::Internal.is_client_error());
    }
}
