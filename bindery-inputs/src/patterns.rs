//! Regular expressions behind the built-in input types.

use std::sync::LazyLock;

use regex::Regex;

pub static EMAIL_REGEXP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,4}$").unwrap()
});

pub static URL_REGEXP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ftp|http|https)://(\w+:?\w*@)?(\S+)(:([0-9]+))?(/|/([\w#!:.?+=&%@\-/]))?$")
        .unwrap()
});

pub static NUMBER_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-+]?([0-9]+|[0-9]*\.[0-9]*)\s*$").unwrap());
