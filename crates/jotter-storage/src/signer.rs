//! Request signing for the COS XML API.
//!
//! The provider's scheme derives a sign key from the secret key and the
//! credential validity window (HMAC-SHA1), canonicalizes the request into
//! an http string (lowercase method, URI path, sorted url-encoded params
//! and headers), and carries the final credential string in the
//! Authorization header. Because the validity window doubles as the
//! signing key time, every signature this signer produces is scoped to the
//! credential it was built from.

use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

pub struct CosSigner {
    secret_id: String,
    key_time: String,
    /// Hex HMAC-SHA1 of the validity window under the secret key.
    sign_key: String,
}

impl CosSigner {
    /// `start` and `expired` are the credential validity window in epoch
    /// seconds; they become both `q-sign-time` and `q-key-time`.
    pub fn new(secret_id: &str, secret_key: &str, start: i64, expired: i64) -> Self {
        let key_time = format!("{};{}", start, expired);
        let sign_key = hex::encode(Self::hmac_sha1(secret_key.as_bytes(), key_time.as_bytes()));
        Self {
            secret_id: secret_id.to_string(),
            key_time,
            sign_key,
        }
    }

    pub fn key_time(&self) -> &str {
        &self.key_time
    }

    /// Build the Authorization credential string for one request.
    ///
    /// `headers` must hold exactly the headers that go on the wire; keys
    /// are lowercased for the canonical form. `uri_path` is the encoded
    /// path as sent, including the leading slash.
    pub fn authorization(
        &self,
        method: &str,
        uri_path: &str,
        params: &BTreeMap<String, String>,
        headers: &BTreeMap<String, String>,
    ) -> String {
        let (param_list, param_string) = Self::canonicalize(params);
        let (header_list, header_string) = Self::canonicalize(headers);

        let http_string = format!(
            "{}\n{}\n{}\n{}\n",
            method.to_lowercase(),
            uri_path,
            param_string,
            header_string
        );
        let string_to_sign = format!(
            "sha1\n{}\n{}\n",
            self.key_time,
            hex::encode(Sha1::digest(http_string.as_bytes()))
        );
        let signature = hex::encode(Self::hmac_sha1(
            self.sign_key.as_bytes(),
            string_to_sign.as_bytes(),
        ));

        format!(
            "q-sign-algorithm=sha1&q-ak={}&q-sign-time={}&q-key-time={}&q-header-list={}&q-url-param-list={}&q-signature={}",
            self.secret_id, self.key_time, self.key_time, header_list, param_list, signature
        )
    }

    /// Sorted `k;k` list and `k=v&k=v` string, keys lowercased, both halves
    /// RFC 3986 encoded.
    fn canonicalize(map: &BTreeMap<String, String>) -> (String, String) {
        let mut entries: Vec<(String, String)> = map
            .iter()
            .map(|(k, v)| {
                (
                    urlencoding::encode(&k.to_lowercase()).into_owned(),
                    urlencoding::encode(v).into_owned(),
                )
            })
            .collect();
        entries.sort();

        let list = entries
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let string = entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        (list, string)
    }

    fn hmac_sha1(key: &[u8], msg: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can take key of any size");
        mac.update(msg);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn key_time_is_validity_window() {
        let signer = CosSigner::new("AKIDtest", "secret", 1700000000, 1700001800);
        assert_eq!(signer.key_time(), "1700000000;1700001800");
    }

    #[test]
    fn authorization_carries_all_fields() {
        let signer = CosSigner::new("AKIDtest", "secret", 1700000000, 1700001800);
        let auth = signer.authorization(
            "PUT",
            "/1700000000000_ab12cd34.png",
            &BTreeMap::new(),
            &headers(&[("host", "b.cos.r.myqcloud.com"), ("content-length", "42")]),
        );
        assert!(auth.starts_with("q-sign-algorithm=sha1&q-ak=AKIDtest"));
        assert!(auth.contains("q-sign-time=1700000000;1700001800"));
        assert!(auth.contains("q-key-time=1700000000;1700001800"));
        assert!(auth.contains("q-header-list=content-length;host"));
        assert!(auth.contains("q-url-param-list=&"));
        assert!(auth.contains("q-signature="));
    }

    #[test]
    fn signature_is_deterministic() {
        let signer = CosSigner::new("AKIDtest", "secret", 1, 2);
        let hdrs = headers(&[("host", "h")]);
        let a = signer.authorization("put", "/k", &BTreeMap::new(), &hdrs);
        let b = signer.authorization("put", "/k", &BTreeMap::new(), &hdrs);
        assert_eq!(a, b);
    }

    #[test]
    fn signature_depends_on_window() {
        let hdrs = headers(&[("host", "h")]);
        let a = CosSigner::new("id", "secret", 1, 2).authorization(
            "put",
            "/k",
            &BTreeMap::new(),
            &hdrs,
        );
        let b = CosSigner::new("id", "secret", 1, 3).authorization(
            "put",
            "/k",
            &BTreeMap::new(),
            &hdrs,
        );
        assert_ne!(a, b);
    }

    #[test]
    fn method_is_lowercased() {
        let signer = CosSigner::new("id", "secret", 1, 2);
        let hdrs = headers(&[("host", "h")]);
        assert_eq!(
            signer.authorization("PUT", "/k", &BTreeMap::new(), &hdrs),
            signer.authorization("put", "/k", &BTreeMap::new(), &hdrs)
        );
    }

    #[test]
    fn header_keys_are_lowercased_in_list() {
        let signer = CosSigner::new("id", "secret", 1, 2);
        let auth = signer.authorization(
            "put",
            "/k",
            &BTreeMap::new(),
            &headers(&[("Host", "h"), ("Content-Length", "1")]),
        );
        assert!(auth.contains("q-header-list=content-length;host"));
    }
}
