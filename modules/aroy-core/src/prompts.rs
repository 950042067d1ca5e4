use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// How many items every primary prompt demands. The card grid is sized for
/// this count, and the verification floor assumes it.
pub const RECOMMENDATION_COUNT: usize = 15;

static THAILAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)thailand|thai|bangkok|phuket|chiang mai|pattaya").unwrap()
});

/// True when the text contains Thai script (ก through ๙).
pub fn is_thai_text(text: &str) -> bool {
    text.chars().any(|c| ('\u{0e01}'..='\u{0e59}').contains(&c))
}

/// Restaurant queries also get Thai treatment for well-known Thailand
/// place names written in Latin script.
pub fn is_thai_restaurant_query(location: &str) -> bool {
    is_thai_text(location) || THAILAND_RE.is_match(location)
}

/// Slimmed-down candidate sent back to the model for location verification.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyCandidate {
    pub id: String,
    pub name: String,
    pub address: String,
}

/// Prompt for the primary restaurant call: exactly 15 real establishments
/// near `location`, returned as a raw JSON array.
pub fn build_restaurant_prompt(location: &str) -> String {
    let thai = is_thai_restaurant_query(location);

    let mut prompt = String::from(
        "You are a knowledgeable food and restaurant expert with extensive knowledge of global \
         cuisines and dining establishments, with special expertise in Thai cuisine and \
         restaurants in Thailand.\n\n",
    );
    if thai {
        prompt.push_str(
            "คุณเป็นผู้เชี่ยวชาญด้านอาหารและร้านอาหารในประเทศไทย \
             ให้คำแนะนำร้านอาหารที่ดีที่สุดในแต่ละพื้นที่\n\n",
        );
    }

    prompt.push_str(&format!(
        "Generate a detailed list of exactly {RECOMMENDATION_COUNT} authentic restaurant \
         recommendations near {location}.\n"
    ));
    if thai {
        prompt.push_str(
            "เน้นร้านอาหารที่มีอยู่จริงและมีชื่อเสียงในพื้นที่นี้ \
             ให้ข้อมูลที่ถูกต้องและเป็นประโยชน์สำหรับคนท้องถิ่นและนักท่องเที่ยว\n",
        );
    }

    prompt.push_str(&format!(
        "\nIMPORTANT: Only include REAL restaurants that ACTUALLY EXIST in {location}. Do not \
         make up fictional restaurants.\n\
         Use your knowledge to recommend well-known, popular, and authentic restaurants that \
         are definitely located in {location}.\n\n\
         Include a diverse mix of cuisines, price ranges, and dining experiences.\n"
    ));
    if thai {
        prompt.push_str(
            "รวมร้านอาหารไทยท้องถิ่น ร้านอาหารที่มีชื่อเสียง และร้านที่คนท้องถิ่นนิยม\n",
        );
    }

    prompt.push_str(
        "\nFor each restaurant, provide authentic and accurate information including realistic \
         addresses, ratings, and descriptions.\n",
    );
    if thai {
        prompt.push_str(
            "ให้ที่อยู่ที่ถูกต้อง คะแนนที่สมจริง \
             และคำอธิบายที่มีประโยชน์เกี่ยวกับอาหารเด่นและบรรยากาศของร้าน\n",
        );
    }

    let name_note = if thai {
        " in Thai with English translation if applicable"
    } else {
        ""
    };
    let bilingual = if thai { " in Thai and English" } else { "" };
    let address_note = if thai {
        " using Thai address format with district and sub-district"
    } else {
        ""
    };
    prompt.push_str(&format!(
        "\nFormat the response as a valid JSON array of restaurant objects with the following \
         properties:\n\
         - id: a unique string identifier (use format \"rest-1\", \"rest-2\", etc.)\n\
         - name: the restaurant name{name_note} (be creative and authentic to the location's \
         culture)\n\
         - cuisine: the specific type of cuisine{bilingual} (be precise, e.g., \
         \"อาหารไทยภาคเหนือ (Northern Thai)\" instead of just \"Thai\")\n\
         - address: a realistic and detailed address in {location}{address_note}\n\
         - rating: a number between 1 and 5 (can include one decimal place for precision)\n\
         - priceRange: a string like \"$\", \"$$\", \"$$$\", or \"$$$$\" indicating \
         affordability\n\
         - description: a detailed 2-3 sentence description{bilingual} highlighting unique \
         aspects, signature dishes, ambiance, or history\n\
         - imageUrl: leave this empty or null as we'll use default images\n\n\
         Ensure each restaurant has all required properties and the data is well-formatted as \
         a valid JSON array.\n\
         Only return the JSON array, nothing else. No explanations, no markdown formatting, \
         just the raw JSON array.\n"
    ));

    prompt
}

/// Prompt for the primary food call: exactly 15 dishes of the requested type.
pub fn build_food_prompt(food_type: &str) -> String {
    let thai = is_thai_text(food_type);

    let mut prompt = String::from(
        "You are a culinary expert with deep knowledge of global cuisines, cooking techniques, \
         and food history, with special expertise in Thai cuisine.\n\n",
    );
    if thai {
        prompt.push_str(
            "คุณเป็นผู้เชี่ยวชาญด้านอาหารไทยและอาหารนานาชาติ \
             ให้ข้อมูลที่ถูกต้องและละเอียดเกี่ยวกับอาหารแต่ละชนิด\n\n",
        );
    }

    prompt.push_str(&format!(
        "Generate a detailed list of exactly {RECOMMENDATION_COUNT} {food_type} food \
         recommendations.\n"
    ));
    if thai {
        prompt.push_str(
            "เน้นอาหารที่เป็นที่นิยมและมีความสำคัญทางวัฒนธรรม ให้ข้อมูลที่ถูกต้องและเป็นประโยชน์\n",
        );
    }

    prompt.push_str(
        "\nInclude a diverse mix of dishes, from traditional classics to modern \
         interpretations.\n",
    );
    if thai {
        prompt.push_str(
            "รวมทั้งอาหารดั้งเดิมและอาหารประยุกต์ร่วมสมัย แสดงให้เห็นความหลากหลายของอาหารประเภทนี้\n",
        );
    }

    prompt.push_str(
        "\nFor each food item, provide authentic and accurate information including cultural \
         context and key ingredients.\n",
    );
    if thai {
        prompt.push_str(
            "ให้ข้อมูลที่ถูกต้องเกี่ยวกับประวัติความเป็นมา วิธีการทำ \
             และวัตถุดิบสำคัญของอาหารแต่ละชนิด\n",
        );
    }

    let name_note = if thai {
        " in Thai with English translation"
    } else {
        " in both local language (if applicable) and English"
    };
    let bilingual = if thai { " in Thai and English" } else { "" };
    prompt.push_str(&format!(
        "\nFormat the response as a valid JSON array of food objects with the following \
         properties:\n\
         - id: a unique string identifier (use format \"food-1\", \"food-2\", etc.)\n\
         - name: the food name{name_note}\n\
         - cuisine: the specific regional cuisine this food belongs to{bilingual}\n\
         - description: a detailed 2-3 sentence description{bilingual} explaining what the \
         dish is, its origin, how it's prepared, and what makes it special\n\
         - ingredients: an array of 5-8 main ingredients used in the dish{bilingual}\n\
         - imageUrl: leave this empty or null as we'll use default images\n\n\
         Ensure each food item has all required properties and the data is well-formatted as \
         a valid JSON array.\n\
         Only return the JSON array, nothing else. No explanations, no markdown formatting, \
         just the raw JSON array.\n"
    ));

    prompt
}

/// Prompt for the secondary verification call: given `{id, name, address}`
/// triples, return a raw JSON array holding only the ids the model believes
/// are real establishments in `location`.
pub fn build_verification_prompt(candidates: &[VerifyCandidate], location: &str) -> String {
    let listing = serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a local expert with extensive knowledge of restaurants and locations in \
         Thailand and around the world.\n\n\
         I have a list of restaurants that are supposed to be in or near \"{location}\".\n\
         Your task is to verify which of these restaurants actually exist in this location.\n\n\
         For each restaurant, determine:\n\
         1. If it's a real restaurant that exists in {location}\n\
         2. If the address is accurate for this location\n\n\
         Here's the list of restaurants:\n\
         {listing}\n\n\
         Return a JSON array containing ONLY the IDs of restaurants that are verified to be \
         real and actually in {location}.\n\
         Format your response as: [\"rest-1\", \"rest-3\", \"rest-5\"] (just the IDs in an \
         array)\n\n\
         Only return the JSON array, nothing else. No explanations, no markdown formatting, \
         just the raw JSON array of verified restaurant IDs.\n"
    )
}
