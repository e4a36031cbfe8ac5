//! Pattern counts over user-supplied source text.
//!
//! These are plain regex scans, not parsing. They only feed the "what we
//! noticed" sections of the reports.

use regex::Regex;

#[derive(Debug, Clone)]
pub struct Scanner {
    chain_id: Regex,
    endpoint: Regex,
    await_in_loop: Regex,
    await_kw: Regex,
    promise_all: Regex,
    estimate_gas: Regex,
    get_logs: Regex,
    polling: Regex,
    string_require: Regex,
    for_loop: Regex,
}

impl Scanner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            chain_id: Regex::new(r#"(?i)chain[_\s]?id["']?\s*(?:===|==|:|=)\s*["']?(\d+)"#)?,
            endpoint: Regex::new(r#"(?:https?|wss?)://[^\s"'`,)]+"#)?,
            await_in_loop: Regex::new(r"(?s)\b(?:for|while)\s*\([^)]*\)\s*\{[^}]*\bawait\b")?,
            await_kw: Regex::new(r"\bawait\b")?,
            promise_all: Regex::new(r"Promise\.(?:allSettled|all)\b")?,
            estimate_gas: Regex::new(r"\bestimateGas\b|eth_estimateGas")?,
            get_logs: Regex::new(r"\bgetLogs\b|eth_getLogs|\bgetPastEvents\b")?,
            polling: Regex::new(r"\bsetInterval\s*\(")?,
            string_require: Regex::new(r#"require\s*\([^;]*,\s*""#)?,
            for_loop: Regex::new(r"\bfor\s*\(")?,
        })
    }

    /// Chain ids assigned or compared in `code`, unique, in order of first
    /// appearance.
    pub fn chain_ids(&self, code: &str) -> Vec<u64> {
        let mut ids = Vec::new();
        for caps in self.chain_id.captures_iter(code) {
            if let Some(id) = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    pub fn endpoints(&self, code: &str) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for m in self.endpoint.find_iter(code) {
            let url = m.as_str().to_string();
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        urls
    }

    pub fn awaits_in_loops(&self, code: &str) -> usize {
        self.await_in_loop.find_iter(code).count()
    }

    pub fn awaits(&self, code: &str) -> usize {
        self.await_kw.find_iter(code).count()
    }

    pub fn promise_alls(&self, code: &str) -> usize {
        self.promise_all.find_iter(code).count()
    }

    pub fn estimate_gas_calls(&self, code: &str) -> usize {
        self.estimate_gas.find_iter(code).count()
    }

    pub fn log_queries(&self, code: &str) -> usize {
        self.get_logs.find_iter(code).count()
    }

    pub fn polling_loops(&self, code: &str) -> usize {
        self.polling.find_iter(code).count()
    }

    pub fn string_requires(&self, code: &str) -> usize {
        self.string_require.find_iter(code).count()
    }

    pub fn for_loops(&self, code: &str) -> usize {
        self.for_loop.find_iter(code).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids() {
        let scanner = Scanner::new().unwrap();
        let code = r#"
            networks: { mainnet: { chainId: 1 }, local: { chainId: 31337 } }
            require(block.chainid == 1, "wrong chain");
            const CHAIN_ID = "137";
        "#;
        assert_eq!(scanner.chain_ids(code), vec![1, 31337, 137]);
    }

    #[test]
    fn test_endpoints() {
        let scanner = Scanner::new().unwrap();
        let code = r#"url: "https://eth.llamarpc.com", ws: 'wss://x.io/ws', again: "https://eth.llamarpc.com""#;
        assert_eq!(
            scanner.endpoints(code),
            vec!["https://eth.llamarpc.com".to_string(), "wss://x.io/ws".to_string()]
        );
    }

    #[test]
    fn test_await_in_loop() {
        let scanner = Scanner::new().unwrap();
        let code = "for (let i = 0; i < n; i++) {\n  const b = await c.balanceOf(a[i]);\n}";
        assert_eq!(scanner.awaits_in_loops(code), 1);
        assert_eq!(scanner.awaits(code), 1);
        assert_eq!(scanner.awaits_in_loops("await Promise.all(xs)"), 0);
    }

    #[test]
    fn test_estimate_gas() {
        let scanner = Scanner::new().unwrap();
        let code = "await c.estimateGas.transfer(); provider.send('eth_estimateGas', [])";
        assert_eq!(scanner.estimate_gas_calls(code), 2);
        assert_eq!(scanner.estimate_gas_calls(""), 0);
    }

    #[test]
    fn test_string_requires() {
        let scanner = Scanner::new().unwrap();
        let code = r#"require(x > 0, "zero"); require(ok);"#;
        assert_eq!(scanner.string_requires(code), 1);
    }
}
