//! Page-number formatting (`format` tokens of a page sequence).

use crate::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    /// `1`, or `01`, `001`... with zero padding to the token's width.
    #[default]
    Decimal,
    ZeroPadded(usize),
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
}

impl NumberFormat {
    pub fn parse(token: &str) -> Result<Self, LayoutError> {
        let token = token.trim();
        match token {
            "" | "1" => Ok(NumberFormat::Decimal),
            "i" => Ok(NumberFormat::LowerRoman),
            "I" => Ok(NumberFormat::UpperRoman),
            "a" => Ok(NumberFormat::LowerAlpha),
            "A" => Ok(NumberFormat::UpperAlpha),
            t if t.ends_with('1') && t[..t.len() - 1].chars().all(|c| c == '0') => {
                Ok(NumberFormat::ZeroPadded(t.len()))
            }
            other => Err(LayoutError::PageNumberFormat(other.to_string())),
        }
    }

    pub fn format(&self, n: usize) -> String {
        match self {
            NumberFormat::Decimal => n.to_string(),
            NumberFormat::ZeroPadded(width) => format!("{:0width$}", n, width = *width),
            NumberFormat::LowerRoman => int_to_lower_roman(n),
            NumberFormat::UpperRoman => int_to_lower_roman(n).to_uppercase(),
            NumberFormat::LowerAlpha => int_to_lower_alpha(n),
            NumberFormat::UpperAlpha => int_to_lower_alpha(n).to_uppercase(),
        }
    }
}

fn int_to_lower_alpha(n: usize) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut s = String::new();
    let mut num = n - 1;
    loop {
        s.insert(0, (b'a' + (num % 26) as u8) as char);
        num /= 26;
        if num == 0 {
            break;
        }
        num -= 1;
    }
    s
}

fn int_to_lower_roman(n: usize) -> String {
    // Roman numerals have no zero.
    if n == 0 {
        return "0".to_string();
    }
    const VALUES: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut num = n;
    let mut result = String::new();
    for (val, sym) in VALUES {
        while num >= val {
            result.push_str(sym);
            num -= val;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(NumberFormat::parse("1").unwrap().format(12), "12");
        assert_eq!(NumberFormat::parse("001").unwrap().format(7), "007");
        assert_eq!(NumberFormat::parse("i").unwrap().format(14), "xiv");
        assert_eq!(NumberFormat::parse("I").unwrap().format(1999), "MCMXCIX");
        assert_eq!(NumberFormat::parse("a").unwrap().format(27), "aa");
        assert_eq!(NumberFormat::parse("A").unwrap().format(3), "C");
        assert_eq!(NumberFormat::parse("").unwrap(), NumberFormat::Decimal);
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        assert!(matches!(
            NumberFormat::parse("x"),
            Err(LayoutError::PageNumberFormat(t)) if t == "x"
        ));
    }
}
