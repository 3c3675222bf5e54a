//! CSI parameter parsing
//!
//! Semicolon-separated decimal parameters; colon-separated subparameters are
//! kept per parameter for extended SGR forms like `4:3`.

/// Maximum number of parameters tracked per sequence
const MAX_PARAMS: usize = 32;

/// Parsed CSI parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    /// Parameter values; 0 means default/unspecified
    values: Vec<u16>,
    /// Colon subparameters per parameter
    subparams: Vec<Vec<u16>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create params from known values (tests)
    pub fn from_slice(values: &[u16]) -> Self {
        Self {
            values: values.to_vec(),
            subparams: vec![Vec::new(); values.len()],
        }
    }

    /// Parse the raw parameter bytes of a CSI sequence
    pub fn parse(bytes: &[u8]) -> Self {
        let mut params = Self::new();
        let mut current: u16 = 0;
        let mut has_value = false;
        let mut subparams: Vec<u16> = Vec::new();
        let mut in_subparam = false;

        let mut push = |params: &mut Params,
                        current: &mut u16,
                        has_value: &mut bool,
                        subparams: &mut Vec<u16>,
                        in_subparam: &mut bool| {
            if params.values.len() >= MAX_PARAMS {
                return;
            }
            if *in_subparam {
                subparams.push(if *has_value { *current } else { 0 });
                let head = subparams.remove(0);
                params.values.push(head);
                params.subparams.push(std::mem::take(subparams));
            } else {
                params.values.push(if *has_value { *current } else { 0 });
                params.subparams.push(Vec::new());
            }
            *current = 0;
            *has_value = false;
            *in_subparam = false;
        };

        for &byte in bytes {
            match byte {
                b'0'..=b'9' => {
                    has_value = true;
                    current = current
                        .saturating_mul(10)
                        .saturating_add((byte - b'0') as u16);
                }
                b';' => {
                    push(
                        &mut params,
                        &mut current,
                        &mut has_value,
                        &mut subparams,
                        &mut in_subparam,
                    );
                }
                b':' => {
                    subparams.push(if has_value { current } else { 0 });
                    current = 0;
                    has_value = false;
                    in_subparam = true;
                }
                _ => {
                    // Other bytes in the parameter range are ignored
                }
            }
        }

        if has_value || in_subparam || !params.values.is_empty() || !bytes.is_empty() {
            push(
                &mut params,
                &mut current,
                &mut has_value,
                &mut subparams,
                &mut in_subparam,
            );
        }

        params
    }

    /// Parameter at index; None when absent or 0 (default)
    pub fn get(&self, index: usize) -> Option<u16> {
        self.values.get(index).copied().filter(|&v| v != 0)
    }

    /// Parameter at index with a default for absent/0
    pub fn get_or(&self, index: usize, default: u16) -> u16 {
        self.get(index).unwrap_or(default)
    }

    /// Raw value at index (0 when absent)
    pub fn raw(&self, index: usize) -> u16 {
        self.values.get(index).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Colon subparameters of the parameter at index
    pub fn subparams(&self, index: usize) -> &[u16] {
        self.subparams.get(index).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Iterate over raw parameter values
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.values.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_empty() {
        let params = Params::parse(b"");
        assert!(params.is_empty());
    }

    #[test]
    fn test_params_single() {
        let params = Params::parse(b"42");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(0), Some(42));
    }

    #[test]
    fn test_params_multiple() {
        let params = Params::parse(b"1;2;3");
        let values: Vec<_> = params.iter().collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_params_defaults() {
        let params = Params::parse(b";5;");
        assert_eq!(params.len(), 3);
        assert_eq!(params.get(0), None);
        assert_eq!(params.get(1), Some(5));
        assert_eq!(params.get(2), None);
        assert_eq!(params.get_or(0, 1), 1);
        assert_eq!(params.raw(0), 0);
    }

    #[test]
    fn test_params_overflow_saturates() {
        let params = Params::parse(b"99999");
        assert_eq!(params.get(0), Some(65535));
    }

    #[test]
    fn test_params_subparams() {
        // Extended underline: 4:3
        let params = Params::parse(b"4:3");
        assert_eq!(params.len(), 1);
        assert_eq!(params.raw(0), 4);
        assert_eq!(params.subparams(0), &[3]);
    }

    #[test]
    fn test_params_subparams_mixed() {
        let params = Params::parse(b"1;4:3;5");
        assert_eq!(params.len(), 3);
        assert_eq!(params.raw(0), 1);
        assert_eq!(params.raw(1), 4);
        assert_eq!(params.subparams(1), &[3]);
        assert_eq!(params.raw(2), 5);
        assert_eq!(params.subparams(2), &[] as &[u16]);
    }

    #[test]
    fn test_params_zero_is_default() {
        let params = Params::parse(b"0");
        assert_eq!(params.len(), 1);
        assert_eq!(params.raw(0), 0);
        assert_eq!(params.get(0), None);
    }
}
