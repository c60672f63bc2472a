//! UI text in English, Japanese and Turkish.
//!
//! Keys are dotted paths such as `common.addToCart`. Lookup falls back from
//! the selected language to English, and from English to the key itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Supported UI languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
    Tr,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Language::En, Language::Ja, Language::Tr]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
            Language::Tr => "tr",
        }
    }

    /// Name of the language in itself.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ja => "日本語",
            Language::Tr => "Türkçe",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Language::En => "🇬🇧",
            Language::Ja => "🇯🇵",
            Language::Tr => "🇹🇷",
        }
    }

    /// Picks a language from a locale string like `ja_JP.UTF-8` or `tr-TR`.
    pub fn from_locale(locale: &str) -> Option<Language> {
        let prefix = locale.split(['-', '_', '.']).next()?;
        prefix.parse().ok()
    }

    fn table(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::En => EN,
            Language::Ja => JA,
            Language::Tr => TR,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ja" => Ok(Language::Ja),
            "tr" => Ok(Language::Tr),
            _ => Err(DomainError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Looks up UI text for one language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the text for `key`, or `key` itself when no table has it.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let found: Option<&'a str> =
            lookup(self.language, key).or_else(|| lookup(Language::En, key));
        found.unwrap_or(key)
    }
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    language
        .table()
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
}

const EN: &[(&str, &str)] = &[
    ("common.settings", "⚙️ Settings"),
    ("common.save", "Save"),
    ("common.cancel", "Cancel"),
    ("common.loading", "Loading..."),
    ("common.empty", "No items found"),
    ("common.category", "Select Category"),
    ("common.addToCart", "Add to Cart 🛒"),
    ("common.emptyCart", "Your cart is empty"),
    ("common.shoppingCart", "Shopping Cart"),
    ("common.title", "Tax-Free Shopping Calculator"),
    ("common.priceIn", "Price in"),
    ("common.originalPrice", "Original Price"),
    ("common.taxFreePrice", "Tax-Free Price"),
    ("common.enterAmount", "Enter amount..."),
    ("common.calculateTaxFree", "Calculate Tax-Free Price"),
    ("common.off", "off"),
    ("categories.food", "Food & Drinks"),
    ("categories.tech", "Technology"),
    ("categories.fashion", "Fashion"),
    ("categories.transport", "Transportation"),
    ("categories.beauty", "Beauty & Health"),
    ("categories.gifts", "Gifts & Souvenirs"),
    ("categories.entertainment", "Entertainment"),
    ("categories.other", "Other"),
    ("analytics.title", "Shopping Analysis"),
    ("analytics.dailySpending", "Daily Tax-Free Shopping"),
    ("analytics.byCategory", "Spending by Category"),
    ("analytics.total", "Total"),
    ("favorites.title", "Frequently Bought"),
    ("favorites.show", "Show Frequently Bought"),
    ("favorites.hide", "Hide Frequently Bought"),
    ("favorites.timesBought", "times bought"),
    ("settings.language", "Language"),
    ("settings.taxFree", "Tax-Free Settings"),
    ("settings.enableTaxFree", "Enable Tax-Free Calculation"),
    ("settings.taxFreeRate", "Tax-Free Rate"),
    ("settings.countries", "Country Settings"),
    ("settings.selectHome", "Select Home Country"),
    ("settings.selectTourist", "Select Tourist Country"),
];

const JA: &[(&str, &str)] = &[
    ("common.settings", "⚙️ 設定"),
    ("common.save", "保存"),
    ("common.cancel", "キャンセル"),
    ("common.loading", "読み込み中..."),
    ("common.empty", "アイテムが見つかりません"),
    ("common.category", "カテゴリーを選択"),
    ("common.addToCart", "カートに追加 🛒"),
    ("common.emptyCart", "カートは空です"),
    ("common.shoppingCart", "ショッピングカート"),
    ("common.title", "免税計算機"),
    ("common.priceIn", "価格"),
    ("common.originalPrice", "元の価格"),
    ("common.taxFreePrice", "免税価格"),
    ("common.enterAmount", "金額を入力..."),
    ("common.calculateTaxFree", "免税価格を計算"),
    ("common.off", "オフ"),
    ("categories.food", "飲食"),
    ("categories.tech", "テクノロジー"),
    ("categories.fashion", "ファッション"),
    ("categories.transport", "交通"),
    ("categories.beauty", "美容・健康"),
    ("categories.gifts", "ギフト・お土産"),
    ("categories.entertainment", "エンターテイメント"),
    ("categories.other", "その他"),
    ("analytics.title", "ショッピング分析"),
    ("analytics.dailySpending", "免税品の日別購入"),
    ("analytics.byCategory", "カテゴリー別支出"),
    ("analytics.total", "合計"),
    ("favorites.title", "よく購入する商品"),
    ("favorites.show", "よく購入する商品を表示"),
    ("favorites.hide", "よく購入する商品を非表示"),
    ("favorites.timesBought", "回購入"),
    ("settings.language", "言語"),
    ("settings.taxFree", "免税設定"),
    ("settings.enableTaxFree", "免税計算を有効にする"),
    ("settings.taxFreeRate", "免税率"),
    ("settings.countries", "国設定"),
    ("settings.selectHome", "居住国を選択"),
    ("settings.selectTourist", "旅行国を選択"),
];

const TR: &[(&str, &str)] = &[
    ("common.settings", "⚙️ Ayarlar"),
    ("common.save", "Kaydet"),
    ("common.cancel", "İptal"),
    ("common.loading", "Yükleniyor..."),
    ("common.empty", "Öğe bulunamadı"),
    ("common.category", "Kategori Seç"),
    ("common.addToCart", "Sepete Ekle 🛒"),
    ("common.emptyCart", "Sepetiniz boş"),
    ("common.shoppingCart", "Alışveriş Sepeti"),
    ("common.title", "Tax-Free Alışveriş Hesaplayıcı"),
    ("common.priceIn", "Fiyat"),
    ("common.originalPrice", "Orijinal Fiyat"),
    ("common.taxFreePrice", "Tax-Free Fiyat"),
    ("common.enterAmount", "Tutar girin..."),
    ("common.calculateTaxFree", "Tax-Free Fiyat Hesapla"),
    ("common.off", "indirim"),
    ("categories.food", "Yeme & İçme"),
    ("categories.tech", "Teknoloji"),
    ("categories.fashion", "Giyim"),
    ("categories.transport", "Ulaşım"),
    ("categories.beauty", "Güzellik & Sağlık"),
    ("categories.gifts", "Hediyeler & Hediyelik"),
    ("categories.entertainment", "Eğlence"),
    ("categories.other", "Diğer"),
    ("analytics.title", "Alışveriş Analizi"),
    ("analytics.dailySpending", "Günlük Tax-Free Alışveriş"),
    ("analytics.byCategory", "Kategoriye Göre Harcama"),
    ("analytics.total", "Toplam"),
    ("favorites.title", "Sık Alınanlar"),
    ("favorites.show", "Sık Alınanları Göster"),
    ("favorites.hide", "Sık Alınanları Gizle"),
    ("favorites.timesBought", "kez alındı"),
    ("settings.language", "Dil"),
    ("settings.taxFree", "Tax-Free Ayarları"),
    ("settings.enableTaxFree", "Tax-Free Hesaplamayı Etkinleştir"),
    ("settings.taxFreeRate", "Tax-Free Oranı"),
    ("settings.countries", "Ülke Ayarları"),
    ("settings.selectHome", "Yaşadığınız Ülkeyi Seçin"),
    ("settings.selectTourist", "Turist Ülkesini Seçin"),
];
