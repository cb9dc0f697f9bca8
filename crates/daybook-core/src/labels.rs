//! Display strings for the terminal
//! host. The calendar core never sees
//! these; it only hands out dates.

use crate::navigator::ViewType;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Language {
  English,
  Turkish
}

impl Language {
  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "en" | "english" => {
        Some(Self::English)
      }
      | "tr" | "turkish" => {
        Some(Self::Turkish)
      }
      | _ => None
    }
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::English => "en",
      | Self::Turkish => "tr"
    }
  }

  pub fn labels(
    self
  ) -> &'static Labels {
    match self {
      | Self::English => &ENGLISH,
      | Self::Turkish => &TURKISH
    }
  }
}

#[derive(Debug)]
pub struct Labels {
  pub views:          [&'static str; 4],
  pub days_short:     [&'static str; 7],
  pub days_full:      [&'static str; 7],
  pub months:         [&'static str; 12],
  pub go_to_today:    &'static str,
  pub no_notes:       &'static str,
  pub has_notes:      &'static str,
  pub settings:       &'static str,
  pub language:       &'static str,
  pub language_name:  &'static str,
  pub app_version:    &'static str,
  pub privacy_policy: &'static str,
  pub terms:          &'static str,
  pub onboarding:     [(&'static str, &'static str); 4]
}

impl Labels {
  pub fn view(
    &self,
    view: ViewType
  ) -> &'static str {
    let idx = match view {
      | ViewType::Year => 0,
      | ViewType::Month => 1,
      | ViewType::Week => 2,
      | ViewType::Day => 3
    };
    self.views[idx]
  }

  /// `month` is 1-based.
  pub fn month(
    &self,
    month: u32
  ) -> &'static str {
    let idx = (month.clamp(1, 12) - 1)
      as usize;
    self.months[idx]
  }
}

static ENGLISH: Labels = Labels {
  views:          [
    "Year", "Month", "Week", "Day",
  ],
  days_short:     [
    "Mon", "Tue", "Wed", "Thu", "Fri",
    "Sat", "Sun",
  ],
  days_full:      [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
  ],
  months:         [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
  ],
  go_to_today:    "Go to today",
  no_notes:       "No notes for this day",
  has_notes:      "Has notes",
  settings:       "Settings",
  language:       "Language",
  language_name:  "English",
  app_version:    "App Version",
  privacy_policy: "Privacy Policy",
  terms:          "Terms of Service",
  onboarding:     [
    (
      "Explore Your Calendar",
      "Year, month, week or day. Browse \
       in any view you like."
    ),
    (
      "Write Your Notes",
      "Add notes for each day. Organize \
       with colors."
    ),
    (
      "You're Ready!",
      "Simple. Fast. For you."
    ),
    (
      "Privacy and Terms",
      "By continuing, you agree to our \
       Privacy Policy and Terms of \
       Service."
    )
  ]
};

static TURKISH: Labels = Labels {
  views:          [
    "Yıl", "Ay", "Hafta", "Gün",
  ],
  days_short:     [
    "Pzt", "Sal", "Çar", "Per", "Cum",
    "Cmt", "Paz",
  ],
  days_full:      [
    "Pazartesi",
    "Salı",
    "Çarşamba",
    "Perşembe",
    "Cuma",
    "Cumartesi",
    "Pazar",
  ],
  months:         [
    "Ocak", "Şubat", "Mart", "Nisan",
    "Mayıs", "Haziran", "Temmuz",
    "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
  ],
  go_to_today:    "Bugüne dön",
  no_notes:       "Bu gün için not yok",
  has_notes:      "Not var",
  settings:       "Ayarlar",
  language:       "Dil",
  language_name:  "Türkçe",
  app_version:    "Uygulama Sürümü",
  privacy_policy: "Gizlilik Politikası",
  terms:          "Kullanım Koşulları",
  onboarding:     [
    (
      "Takvimini Keşfet",
      "Yıl, ay, hafta veya gün. \
       İstediğin görünümde gezin."
    ),
    (
      "Notlarını Yaz",
      "Her güne özel notlar ekle. \
       Renklerle düzenle."
    ),
    (
      "Hazırsın!",
      "Basit. Hızlı. Senin için."
    ),
    (
      "Gizlilik ve Kullanım",
      "Devam ederek Gizlilik Politikası \
       ve Kullanım Koşullarını kabul \
       etmiş olursunuz."
    )
  ]
};
