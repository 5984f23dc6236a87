/// 生成以 snake_case 字符串存储与传输的枚举
///
/// 自动实现 `as_str`、`Display`、`FromStr` 以及带友好错误信息的 `Deserialize`。
#[macro_export]
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, ts_rs::TS)]
        #[serde(rename_all = "snake_case")]
        $(#[$meta])*
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(
                        "Invalid {} '{}'. Expected one of: {}",
                        stringify!($name),
                        s,
                        [$($value),+].join(", ")
                    )),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    // 与单参数的 crate Result 别名同处一个作用域时宏也要能展开
    #[allow(unused_imports)]
    use crate::errors::Result;

    string_enum! {
        pub enum Shade {
            Light => "light",
            Dark => "dark",
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("dark".parse::<Shade>(), Ok(Shade::Dark));
        assert_eq!(Shade::Light.to_string(), "light");
        assert_eq!(Shade::ALL.len(), 2);
    }

    #[test]
    fn test_deserialize_rejects_unknown() {
        let ok: Shade = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(ok, Shade::Light);
        let err = serde_json::from_str::<Shade>("\"dim\"").unwrap_err();
        assert!(err.to_string().contains("Expected one of: light, dark"));
    }
}
