//! Fixed catalogues accepted by the search endpoint.
//!
//! Each value converts to the exact form the API expects on the query string
//! (`Category::as_str`, `Country::code`, `Language::code`, `License::code`)
//! and parses back from it. Parsing is case-insensitive and trims whitespace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{EnumKind, EnumParseError};

// ============================================================================
// Category
// ============================================================================

/// YouTube video category, matched by its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    AutosAndVehicles,
    Comedy,
    Education,
    Entertainment,
    FilmAndAnimation,
    Gaming,
    HowtoAndStyle,
    Music,
    NewsAndPolitics,
    NonprofitsAndActivism,
    PeopleAndBlogs,
    PetsAndAnimals,
    ScienceAndTechnology,
    Sports,
    TravelAndEvents,
}

const CATEGORY_VALUES: &[&str] = &[
    "Autos & Vehicles",
    "Comedy",
    "Education",
    "Entertainment",
    "Film & Animation",
    "Gaming",
    "Howto & Style",
    "Music",
    "News & Politics",
    "Nonprofits & Activism",
    "People & Blogs",
    "Pets & Animals",
    "Science & Technology",
    "Sports",
    "Travel & Events",
];

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutosAndVehicles => "Autos & Vehicles",
            Self::Comedy => "Comedy",
            Self::Education => "Education",
            Self::Entertainment => "Entertainment",
            Self::FilmAndAnimation => "Film & Animation",
            Self::Gaming => "Gaming",
            Self::HowtoAndStyle => "Howto & Style",
            Self::Music => "Music",
            Self::NewsAndPolitics => "News & Politics",
            Self::NonprofitsAndActivism => "Nonprofits & Activism",
            Self::PeopleAndBlogs => "People & Blogs",
            Self::PetsAndAnimals => "Pets & Animals",
            Self::ScienceAndTechnology => "Science & Technology",
            Self::Sports => "Sports",
            Self::TravelAndEvents => "Travel & Events",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Category] {
        &[
            Self::AutosAndVehicles,
            Self::Comedy,
            Self::Education,
            Self::Entertainment,
            Self::FilmAndAnimation,
            Self::Gaming,
            Self::HowtoAndStyle,
            Self::Music,
            Self::NewsAndPolitics,
            Self::NonprofitsAndActivism,
            Self::PeopleAndBlogs,
            Self::PetsAndAnimals,
            Self::ScienceAndTechnology,
            Self::Sports,
            Self::TravelAndEvents,
        ]
    }

    pub fn parse(s: &str) -> Result<Self, EnumParseError> {
        let trimmed = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EnumParseError::new(EnumKind::Category, trimmed, CATEGORY_VALUES))
    }
}

// ============================================================================
// Country
// ============================================================================

/// Country declared by the channel owner, identified by Filmot's numeric code.
///
/// Codes run from `1` (`Unknown`) to `250`. The channel owner sets this field,
/// so filtering on it is only as reliable as their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Country(u16);

const COUNTRY_VALUES: &[&str] = &["a code between 1 and 250", "a country name"];

/// Display names indexed by `code - 1`.
const COUNTRY_NAMES: [&str; 250] = [
    "Unknown",
    "Afghanistan",
    "Albania",
    "British Virgin Islands",
    "Aland Islands",
    "Comoros",
    "Barbados",
    "Azerbaijan",
    "Cook Islands",
    "Benin",
    "Angola",
    "Algeria",
    "Dominica",
    "Brazil",
    "Antarctica",
    "Belize",
    "Equatorial Guinea",
    "Cameroon",
    "Australia",
    "American Samoa",
    "Eritrea",
    "Canada",
    "Belarus",
    "Cayman Islands",
    "French Polynesia",
    "Chad",
    "Bermuda",
    "Antigua and Barbuda",
    "French Southern Territories",
    "Congo",
    "Bhutan",
    "Central African Republic",
    "Grenada",
    "Djibouti",
    "Bolivia",
    "Armenia",
    "Guam",
    "Dominican Republic",
    "Bouvet Island",
    "Chile",
    "Holy See (Vatican City State)",
    "Georgia",
    "British Indian Ocean Territory",
    "Bonaire Sint Eustatius and Saba",
    "Isle of Man",
    "Gibraltar",
    "Cambodia",
    "Congo, Democratic Republic of the",
    "Israel",
    "Greenland",
    "Colombia",
    "Bulgaria",
    "Jamaica",
    "Guernsey",
    "Cote d'Ivoire",
    "Cuba",
    "Kenya",
    "Honduras",
    "Curacao",
    "Burkina Faso",
    "Kyrgyzstan",
    "Iceland",
    "Cyprus",
    "Ecuador",
    "Liberia",
    "Kazakhstan",
    "Denmark",
    "Burundi",
    "Luxembourg",
    "Montenegro",
    "Fiji",
    "El Salvador",
    "Madagascar",
    "Morocco",
    "Finland",
    "Cape Verde",
    "Marshall Islands",
    "Netherlands",
    "Heard Island and McDonald Islands",
    "Estonia",
    "Mongolia",
    "Norfolk Island",
    "Hungary",
    "China",
    "Papua New Guinea",
    "Norway",
    "Indonesia",
    "Faroe Islands",
    "Paraguay",
    "Puerto Rico",
    "Iran",
    "Christmas Island",
    "Peru",
    "Saint Kitts and Nevis",
    "Germany",
    "Pitcairn",
    "Saint Martin",
    "Japan",
    "Costa Rica",
    "Poland",
    "San Marino",
    "Jersey",
    "Guadeloupe",
    "Saint Helena",
    "Singapore",
    "Jordan",
    "Czechia",
    "Saint Vincent and the Grenadines",
    "Sweden",
    "Lesotho",
    "Guatemala",
    "Saudi Arabia",
    "Taiwan",
    "Micronesia, Federated States of",
    "Ethiopia",
    "Serbia",
    "Turks and Caicos Islands",
    "Moldova",
    "Hong Kong",
    "South Sudan",
    "Uganda",
    "Mozambique",
    "Falkland Islands (Islas Malvinas)",
    "Suriname",
    "Uruguay",
    "Nepal",
    "Laos",
    "Syria",
    "Western Sahara",
    "New Caledonia",
    "Ghana",
    "Tajikistan",
    "Zambia",
    "Panama",
    "Maldives",
    "Trinidad and Tobago",
    "Portugal",
    "Greece",
    "Turkey",
    "Reunion",
    "Mayotte",
    "Vietnam",
    "Saint Barthelemy",
    "Haiti",
    "Sint Maarten",
    "Mexico",
    "Slovakia",
    "India",
    "Somalia",
    "Namibia",
    "Tanzania",
    "Iraq",
    "United Kingdom",
    "Nauru",
    "United States Virgin Islands",
    "Kuwait",
    "Uzbekistan",
    "New Zealand",
    "Vanuatu",
    "Lebanon",
    "Wallis and Futuna",
    "Nicaragua",
    "Libya",
    "Yemen",
    "North Korea",
    "Macao",
    "Palau",
    "Malawi",
    "Russia",
    "Malaysia",
    "Saint Pierre and Miquelon",
    "Mauritania",
    "Sao Tome and Principe",
    "Mauritius",
    "Sudan",
    "Niue",
    "Swaziland",
    "Northern Mariana Islands",
    "Switzerland",
    "Oman",
    "Thailand",
    "Qatar",
    "Andorra",
    "Tokelau",
    "Romania",
    "Anguilla",
    "Tuvalu",
    "Rwanda",
    "Argentina",
    "United Arab Emirates",
    "Saint Lucia",
    "Aruba",
    "United States Minor Outlying Islands",
    "Seychelles",
    "Austria",
    "Venezuela",
    "Slovenia",
    "Bahamas",
    "Solomon Islands",
    "Bahrain",
    "South Africa",
    "Bangladesh",
    "South Georgia and the South Sandwich Islands",
    "Belgium",
    "Sri Lanka",
    "Bosnia and Herzegovina",
    "Svalbard and Jan Mayen",
    "Botswana",
    "Tonga",
    "Brunei",
    "Tunisia",
    "Cocos (Keeling) Islands",
    "Turkmenistan",
    "Croatia",
    "Ukraine",
    "Egypt",
    "United States",
    "France",
    "Zimbabwe",
    "French Guiana",
    "Gabon",
    "Gambia",
    "Guinea",
    "Guinea-Bissau",
    "Guyana",
    "Ireland",
    "Italy",
    "Kiribati",
    "Latvia",
    "Liechtenstein",
    "Lithuania",
    "Macedonia",
    "Mali",
    "Malta",
    "Martinique",
    "Monaco",
    "Montserrat",
    "Myanmar",
    "Niger",
    "Nigeria",
    "Pakistan",
    "Philippines",
    "Samoa",
    "Senegal",
    "Sierra Leone",
    "South Korea",
    "Spain",
    "Timor-Leste",
    "Togo",
    "West Bank",
];

impl Country {
    pub const UNKNOWN: Country = Country(1);
    pub const UNITED_KINGDOM: Country = Country(153);
    pub const UNITED_STATES: Country = Country(217);

    pub fn from_code(code: u16) -> Result<Self, EnumParseError> {
        if (1..=COUNTRY_NAMES.len()).contains(&usize::from(code)) {
            Ok(Self(code))
        } else {
            Err(EnumParseError::new(
                EnumKind::Country,
                code.to_string(),
                COUNTRY_VALUES,
            ))
        }
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        COUNTRY_NAMES[usize::from(self.0) - 1]
    }

    /// Every known country, ordered by code.
    pub fn all() -> impl Iterator<Item = Country> {
        (1..=COUNTRY_NAMES.len() as u16).map(Country)
    }

    /// Accepts a numeric code or a country name.
    pub fn parse(s: &str) -> Result<Self, EnumParseError> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u16>() {
            return Self::from_code(code);
        }
        COUNTRY_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(trimmed))
            .map(|index| Self(index as u16 + 1))
            .ok_or_else(|| EnumParseError::new(EnumKind::Country, trimmed, COUNTRY_VALUES))
    }
}

// ============================================================================
// Language
// ============================================================================

/// Subtitle language, identified by Filmot's language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    Afrikaans,
    Albanian,
    Arabic,
    Aragonese,
    Armenian,
    Asturian,
    Basque,
    Belarusian,
    Bengali,
    Bosnian,
    Breton,
    Bulgarian,
    Burmese,
    Catalan,
    ChineseSimplified,
    Czech,
    Danish,
    Dutch,
    English,
    Esperanto,
    Estonian,
    Finnish,
    French,
    Georgian,
    German,
    Galician,
    Greek,
    Hebrew,
    Hindi,
    Croatian,
    Hungarian,
    Icelandic,
    Indonesian,
    Italian,
    Japanese,
    Kazakh,
    Khmer,
    Korean,
    Latvian,
    Lithuanian,
    Luxembourgish,
    Macedonian,
    Malayalam,
    Malay,
    Manipuri,
    Mongolian,
    Norwegian,
    Occitan,
    Persian,
    Polish,
    Portuguese,
    Russian,
    Serbian,
    Sinhalese,
    Slovak,
    Slovenian,
    Spanish,
    Swahili,
    Swedish,
    Syriac,
    Tamil,
    Telugu,
    Tagalog,
    Thai,
    Turkish,
    Ukrainian,
    Urdu,
    Uzbek,
    Vietnamese,
    Romanian,
    PortugueseBrazilian,
    Montenegrin,
    ChineseTraditional,
    ChineseBilingual,
    NorwegianBokmal,
    NorthernSami,
}

const LANGUAGE_VALUES: &[&str] = &[
    "af",
    "sq",
    "ar",
    "an",
    "hy",
    "at",
    "eu",
    "be",
    "bn",
    "bs",
    "br",
    "bg",
    "my",
    "ca",
    "zh-cn",
    "cs",
    "da",
    "nl",
    "en",
    "eo",
    "et",
    "fi",
    "fr",
    "ka",
    "de",
    "gl",
    "el",
    "he",
    "hi",
    "hr",
    "hu",
    "is",
    "id",
    "it",
    "ja",
    "kk",
    "km",
    "ko",
    "lv",
    "lt",
    "lb",
    "mk",
    "ml",
    "ms",
    "ma",
    "mn",
    "no",
    "oc",
    "fa",
    "pl",
    "pt-pt",
    "ru",
    "sr",
    "si",
    "sk",
    "sl",
    "es",
    "sw",
    "sv",
    "sy",
    "ta",
    "te",
    "tl",
    "th",
    "tr",
    "uk",
    "ur",
    "uz",
    "vi",
    "ro",
    "pt-br",
    "me",
    "zh-tw",
    "ze",
    "nb",
    "se",
];

impl Language {
    /// Code sent as the `lang` query parameter.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Afrikaans => "af",
            Self::Albanian => "sq",
            Self::Arabic => "ar",
            Self::Aragonese => "an",
            Self::Armenian => "hy",
            Self::Asturian => "at",
            Self::Basque => "eu",
            Self::Belarusian => "be",
            Self::Bengali => "bn",
            Self::Bosnian => "bs",
            Self::Breton => "br",
            Self::Bulgarian => "bg",
            Self::Burmese => "my",
            Self::Catalan => "ca",
            Self::ChineseSimplified => "zh-cn",
            Self::Czech => "cs",
            Self::Danish => "da",
            Self::Dutch => "nl",
            Self::English => "en",
            Self::Esperanto => "eo",
            Self::Estonian => "et",
            Self::Finnish => "fi",
            Self::French => "fr",
            Self::Georgian => "ka",
            Self::German => "de",
            Self::Galician => "gl",
            Self::Greek => "el",
            Self::Hebrew => "he",
            Self::Hindi => "hi",
            Self::Croatian => "hr",
            Self::Hungarian => "hu",
            Self::Icelandic => "is",
            Self::Indonesian => "id",
            Self::Italian => "it",
            Self::Japanese => "ja",
            Self::Kazakh => "kk",
            Self::Khmer => "km",
            Self::Korean => "ko",
            Self::Latvian => "lv",
            Self::Lithuanian => "lt",
            Self::Luxembourgish => "lb",
            Self::Macedonian => "mk",
            Self::Malayalam => "ml",
            Self::Malay => "ms",
            Self::Manipuri => "ma",
            Self::Mongolian => "mn",
            Self::Norwegian => "no",
            Self::Occitan => "oc",
            Self::Persian => "fa",
            Self::Polish => "pl",
            Self::Portuguese => "pt-pt",
            Self::Russian => "ru",
            Self::Serbian => "sr",
            Self::Sinhalese => "si",
            Self::Slovak => "sk",
            Self::Slovenian => "sl",
            Self::Spanish => "es",
            Self::Swahili => "sw",
            Self::Swedish => "sv",
            Self::Syriac => "sy",
            Self::Tamil => "ta",
            Self::Telugu => "te",
            Self::Tagalog => "tl",
            Self::Thai => "th",
            Self::Turkish => "tr",
            Self::Ukrainian => "uk",
            Self::Urdu => "ur",
            Self::Uzbek => "uz",
            Self::Vietnamese => "vi",
            Self::Romanian => "ro",
            Self::PortugueseBrazilian => "pt-br",
            Self::Montenegrin => "me",
            Self::ChineseTraditional => "zh-tw",
            Self::ChineseBilingual => "ze",
            Self::NorwegianBokmal => "nb",
            Self::NorthernSami => "se",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Afrikaans => "Afrikaans",
            Self::Albanian => "Albanian",
            Self::Arabic => "Arabic",
            Self::Aragonese => "Aragonese",
            Self::Armenian => "Armenian",
            Self::Asturian => "Asturian",
            Self::Basque => "Basque",
            Self::Belarusian => "Belarusian",
            Self::Bengali => "Bengali",
            Self::Bosnian => "Bosnian",
            Self::Breton => "Breton",
            Self::Bulgarian => "Bulgarian",
            Self::Burmese => "Burmese",
            Self::Catalan => "Catalan",
            Self::ChineseSimplified => "Chinese Simplified",
            Self::Czech => "Czech",
            Self::Danish => "Danish",
            Self::Dutch => "Dutch",
            Self::English => "English",
            Self::Esperanto => "Esperanto",
            Self::Estonian => "Estonian",
            Self::Finnish => "Finnish",
            Self::French => "French",
            Self::Georgian => "Georgian",
            Self::German => "German",
            Self::Galician => "Galician",
            Self::Greek => "Greek",
            Self::Hebrew => "Hebrew",
            Self::Hindi => "Hindi",
            Self::Croatian => "Croatian",
            Self::Hungarian => "Hungarian",
            Self::Icelandic => "Icelandic",
            Self::Indonesian => "Indonesian",
            Self::Italian => "Italian",
            Self::Japanese => "Japanese",
            Self::Kazakh => "Kazakh",
            Self::Khmer => "Khmer",
            Self::Korean => "Korean",
            Self::Latvian => "Latvian",
            Self::Lithuanian => "Lithuanian",
            Self::Luxembourgish => "Luxembourgish",
            Self::Macedonian => "Macedonian",
            Self::Malayalam => "Malayalam",
            Self::Malay => "Malay",
            Self::Manipuri => "Manipuri",
            Self::Mongolian => "Mongolian",
            Self::Norwegian => "Norwegian",
            Self::Occitan => "Occitan",
            Self::Persian => "Persian",
            Self::Polish => "Polish",
            Self::Portuguese => "Portuguese",
            Self::Russian => "Russian",
            Self::Serbian => "Serbian",
            Self::Sinhalese => "Sinhalese",
            Self::Slovak => "Slovak",
            Self::Slovenian => "Slovenian",
            Self::Spanish => "Spanish",
            Self::Swahili => "Swahili",
            Self::Swedish => "Swedish",
            Self::Syriac => "Syriac",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
            Self::Tagalog => "Tagalog",
            Self::Thai => "Thai",
            Self::Turkish => "Turkish",
            Self::Ukrainian => "Ukrainian",
            Self::Urdu => "Urdu",
            Self::Uzbek => "Uzbek",
            Self::Vietnamese => "Vietnamese",
            Self::Romanian => "Romanian",
            Self::PortugueseBrazilian => "Portuguese Brazilian",
            Self::Montenegrin => "Montenegrin",
            Self::ChineseTraditional => "Chinese Traditional",
            Self::ChineseBilingual => "Chinese Bilingual",
            Self::NorwegianBokmal => "Norwegian Bokmal",
            Self::NorthernSami => "Northern Sami",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Language] {
        &[
            Self::Afrikaans,
            Self::Albanian,
            Self::Arabic,
            Self::Aragonese,
            Self::Armenian,
            Self::Asturian,
            Self::Basque,
            Self::Belarusian,
            Self::Bengali,
            Self::Bosnian,
            Self::Breton,
            Self::Bulgarian,
            Self::Burmese,
            Self::Catalan,
            Self::ChineseSimplified,
            Self::Czech,
            Self::Danish,
            Self::Dutch,
            Self::English,
            Self::Esperanto,
            Self::Estonian,
            Self::Finnish,
            Self::French,
            Self::Georgian,
            Self::German,
            Self::Galician,
            Self::Greek,
            Self::Hebrew,
            Self::Hindi,
            Self::Croatian,
            Self::Hungarian,
            Self::Icelandic,
            Self::Indonesian,
            Self::Italian,
            Self::Japanese,
            Self::Kazakh,
            Self::Khmer,
            Self::Korean,
            Self::Latvian,
            Self::Lithuanian,
            Self::Luxembourgish,
            Self::Macedonian,
            Self::Malayalam,
            Self::Malay,
            Self::Manipuri,
            Self::Mongolian,
            Self::Norwegian,
            Self::Occitan,
            Self::Persian,
            Self::Polish,
            Self::Portuguese,
            Self::Russian,
            Self::Serbian,
            Self::Sinhalese,
            Self::Slovak,
            Self::Slovenian,
            Self::Spanish,
            Self::Swahili,
            Self::Swedish,
            Self::Syriac,
            Self::Tamil,
            Self::Telugu,
            Self::Tagalog,
            Self::Thai,
            Self::Turkish,
            Self::Ukrainian,
            Self::Urdu,
            Self::Uzbek,
            Self::Vietnamese,
            Self::Romanian,
            Self::PortugueseBrazilian,
            Self::Montenegrin,
            Self::ChineseTraditional,
            Self::ChineseBilingual,
            Self::NorwegianBokmal,
            Self::NorthernSami,
        ]
    }

    pub fn parse(s: &str) -> Result<Self, EnumParseError> {
        let trimmed = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|language| language.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EnumParseError::new(EnumKind::Language, trimmed, LANGUAGE_VALUES))
    }
}

// ============================================================================
// License
// ============================================================================

/// Video license filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum License {
    Standard,
    CreativeCommons,
}

const LICENSE_VALUES: &[&str] = &["1", "standard", "2", "creative-commons", "cc"];

impl License {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Standard => 1,
            Self::CreativeCommons => 2,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, EnumParseError> {
        match code {
            1 => Ok(Self::Standard),
            2 => Ok(Self::CreativeCommons),
            other => Err(EnumParseError::new(
                EnumKind::License,
                other.to_string(),
                LICENSE_VALUES,
            )),
        }
    }

    pub fn parse(s: &str) -> Result<Self, EnumParseError> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "1" | "standard" | "youtube" => Ok(Self::Standard),
            "2" | "creative-commons" | "creativecommons" | "cc" => Ok(Self::CreativeCommons),
            _ => Err(EnumParseError::new(
                EnumKind::License,
                trimmed,
                LICENSE_VALUES,
            )),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! string_backed {
    ($ty:ty, $render:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.$render())
            }
        }

        impl FromStr for $ty {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = EnumParseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.$render().to_string()
            }
        }
    };
}

string_backed!(Category, as_str);
string_backed!(Language, code);

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Country {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u16> for Country {
    type Error = EnumParseError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<Country> for u16 {
    fn from(country: Country) -> Self {
        country.code()
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "Standard YouTube License",
            Self::CreativeCommons => "Creative Commons",
        })
    }
}

impl FromStr for License {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u8> for License {
    type Error = EnumParseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<License> for u8 {
    fn from(license: License) -> Self {
        license.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_display_name_case_insensitively() {
        assert_eq!(
            Category::parse("film & animation").unwrap(),
            Category::FilmAndAnimation
        );
        assert_eq!(Category::parse(" Music ").unwrap(), Category::Music);
        assert!(Category::parse("Film and Animation").is_err());
        assert!(Category::parse("").is_err());
    }

    #[test]
    fn category_catalogue_is_complete() {
        assert_eq!(Category::all().len(), 15);
        let rendered: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
        assert_eq!(rendered, CATEGORY_VALUES);
    }

    #[test]
    fn country_codes_cover_one_to_250() {
        assert_eq!(Country::all().count(), 250);
        assert_eq!(Country::from_code(1).unwrap().name(), "Unknown");
        assert_eq!(Country::from_code(250).unwrap().name(), "West Bank");
        assert!(Country::from_code(0).is_err());
        assert!(Country::from_code(251).is_err());
    }

    #[test]
    fn country_parses_code_or_name() {
        assert_eq!(Country::parse("217").unwrap(), Country::UNITED_STATES);
        assert_eq!(Country::parse("united kingdom").unwrap(), Country::UNITED_KINGDOM);
        assert_eq!(Country::parse("Israel").unwrap().code(), 49);
        assert!(Country::parse("Atlantis").is_err());
    }

    #[test]
    fn language_codes_round_trip_through_parse() {
        assert_eq!(Language::all().len(), 76);
        for language in Language::all() {
            assert_eq!(Language::parse(language.code()).unwrap(), *language);
        }
        assert_eq!(Language::parse("PT-BR").unwrap(), Language::PortugueseBrazilian);
        assert!(Language::parse("xx").is_err());
    }

    #[test]
    fn license_accepts_codes_and_names() {
        assert_eq!(License::parse("1").unwrap(), License::Standard);
        assert_eq!(License::parse("cc").unwrap(), License::CreativeCommons);
        assert_eq!(License::CreativeCommons.code(), 2);
        assert!(License::from_code(3).is_err());
    }

    #[test]
    fn serde_uses_wire_forms() {
        assert_eq!(
            serde_json::to_string(&Category::NewsAndPolitics).unwrap(),
            "\"News & Politics\""
        );
        assert_eq!(serde_json::to_string(&Country::UNITED_STATES).unwrap(), "217");
        assert_eq!(serde_json::to_string(&Language::ChineseTraditional).unwrap(), "\"zh-tw\"");
        assert_eq!(serde_json::to_string(&License::Standard).unwrap(), "1");

        let lang: Language = serde_json::from_str("\"he\"").unwrap();
        assert_eq!(lang, Language::Hebrew);
        assert!(serde_json::from_str::<Country>("0").is_err());
    }
}
