//! Localized labels for the result view

/// Locale used when a string has no translation for the requested one
pub const FALLBACK_LOCALE: &str = "en";

/// Locale of the UI strings for a language pair such as `en2zh-CHS`
///
/// The target side wins when the pair contains `2`.
pub fn locale_for_pair(language_pair: &str) -> &str {
    match language_pair.split_once('2') {
        Some((_, target)) => target,
        None => language_pair,
    }
}

/// Look up `key` for `locale`, substituting `{name}` placeholders from `params`
///
/// Falls back to English, then to the key itself.
pub fn localize(key: &str, locale: &str, params: &[(&str, String)]) -> String {
    let template = lookup(key, locale)
        .or_else(|| lookup(key, FALLBACK_LOCALE))
        .unwrap_or(key);

    let mut text = template.to_string();
    for (name, value) in params {
        text = text.replace(&format!("{{{}}}", name), value);
    }
    text
}

fn lookup(key: &str, locale: &str) -> Option<&'static str> {
    let text = match (key, locale) {
        ("truncatedMessage", "zh-CHS") => "\n\n*(文本过长，已截取前{limit}字符进行翻译)*",
        ("truncatedMessage", "en") => {
            "\n\n*(Text too long, truncated to first {limit} characters for translation)*"
        }
        ("truncatedMessage", "ja") => "\n\n*(テキストが長すぎます。最初の{limit}文字に切り詰められました)*",
        ("truncatedMessage", "ko") => "\n\n*(텍스트가 너무 깁니다. 처음 {limit}자로 잘랐습니다)*",
        ("truncatedMessage", "fr") => "\n\n*(Texte trop long, tronqué aux {limit} premiers caractères)*",
        ("truncatedMessage", "es") => {
            "\n\n*(Texto demasiado largo, truncado a los primeros {limit} caracteres)*"
        }

        ("truncatedMetadata", "zh-CHS") => "文本过长，已截取前{limit}字符进行翻译",
        ("truncatedMetadata", "en") => "Text truncated to first {limit} characters",
        ("truncatedMetadata", "ja") => "{limit}文字に切り詰められました",
        ("truncatedMetadata", "ko") => "{limit}자로 잘랐습니다",
        ("truncatedMetadata", "fr") => "Tronqué aux {limit} premiers caractères",
        ("truncatedMetadata", "es") => "Truncado a los primeros {limit} caracteres",

        ("translationResult", "zh-CHS") => "翻译结果",
        ("translationResult", "en") => "Translation Result",
        ("translationResult", "ja") => "翻訳結果",
        ("translationResult", "ko") => "번역 결과",
        ("translationResult", "fr") => "Résultat de la traduction",
        ("translationResult", "es") => "Resultado de la traducción",

        ("originalText", "zh-CHS") | ("originalText", "ja") => "原文",
        ("originalText", "en") => "Original Text",
        ("originalText", "ko") => "원본",
        ("originalText", "fr") => "Texte original",
        ("originalText", "es") => "Texto original",

        ("phonetic", "zh-CHS") => "音标",
        ("phonetic", "en") => "Phonetic",
        ("phonetic", "ja") => "発音",
        ("phonetic", "ko") => "발음",
        ("phonetic", "fr") => "Phonétique",
        ("phonetic", "es") => "Fonética",

        ("detail", "zh-CHS") => "详细",
        ("detail", "en") => "Detail",
        ("detail", "ja") => "詳細",
        ("detail", "ko") => "상세",
        ("detail", "fr") => "Détail",
        ("detail", "es") => "Detalle",

        ("webTranslate", "zh-CHS") => "网络翻译",
        ("webTranslate", "en") => "Web Translate",
        ("webTranslate", "ja") => "ウェブ翻訳",
        ("webTranslate", "ko") => "웹 번역",
        ("webTranslate", "fr") => "Traduction web",
        ("webTranslate", "es") => "Traducción web",

        ("hint", "zh-CHS") => "提示",
        ("hint", "en") => "Hint",
        ("hint", "ja") => "ヒント",
        ("hint", "ko") => "힌트",
        ("hint", "fr") => "Indice",
        ("hint", "es") => "Pista",

        ("readOriginal", "zh-CHS") => "朗读原文",
        ("readOriginal", "en") => "Read Original",
        ("readOriginal", "ja") => "原文を読む",
        ("readOriginal", "ko") => "원본 읽기",
        ("readOriginal", "fr") => "Lire l'original",
        ("readOriginal", "es") => "Leer original",

        ("readTranslated", "zh-CHS") => "朗读译文",
        ("readTranslated", "en") => "Read Translated",
        ("readTranslated", "ja") => "訳文を読む",
        ("readTranslated", "ko") => "번역문 읽기",
        ("readTranslated", "fr") => "Lire la traduction",
        ("readTranslated", "es") => "Leer traducción",

        _ => return None,
    };
    Some(text)
}
