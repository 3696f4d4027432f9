#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Initial-class set from a string of MC initials, e.g. `initials!("透定")`.
#[macro_export]
macro_rules! initials {
    ($chars:expr) => {
        $crate::Initials::parse($chars)
    };
}

#[macro_export]
macro_rules! prefix {
    ($(($from:literal, $to:literal)),* $(,)?) => {
        $crate::Rewrite::Prefix(&[$(($from, $to)),*])
    };
}

#[macro_export]
macro_rules! suffix {
    ($(($from:literal, $to:literal)),* $(,)?) => {
        $crate::Rewrite::Suffix(&[$(($from, $to)),*])
    };
}

#[macro_export]
macro_rules! exact {
    ($(($from:literal, $to:literal)),* $(,)?) => {
        $crate::Rewrite::Exact(&[$(($from, $to)),*])
    };
}

#[macro_export]
macro_rules! rule {
    (
        name: $name:expr,
        layer: $layer:ident,
        guard: [ $($guard:expr),* $(,)? ],
        rewrite: |$cat:ident : &Category, $pron:ident : &str| -> Option<String> $body:block
        $(,)?
    ) => {{
        fn rewrite($cat: &$crate::mc::Category, $pron: &str) -> Option<String> {
            $body
        }
        $crate::Rule {
            name: $name,
            layer: $crate::Layer::$layer,
            guards: vec![ $($guard),* ],
            rewrite: $crate::Rewrite::Custom(rewrite),
        }
    }};
    (
        name: $name:expr,
        layer: $layer:ident,
        guard: [ $($guard:expr),* $(,)? ],
        rewrite: $rewrite:expr
        $(,)?
    ) => {{
        $crate::Rule {
            name: $name,
            layer: $crate::Layer::$layer,
            guards: vec![ $($guard),* ],
            rewrite: $rewrite,
        }
    }};
}
