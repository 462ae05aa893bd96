//! Airport catalog backing the flight-search autocomplete.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Airport {
    pub code: &'static str,
    pub name: &'static str,
    pub city: &'static str,
}

impl Airport {
    const fn new(code: &'static str, name: &'static str, city: &'static str) -> Self {
        Self { code, name, city }
    }

    /// Text placed in the input when the airport is picked: `Delhi (DEL)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.city, self.code)
    }

    /// City substring, exact code, or name substring; case-insensitive.
    fn matches(&self, needle: &str) -> bool {
        self.city.to_lowercase().contains(needle)
            || self.code.to_lowercase() == needle
            || self.name.to_lowercase().contains(needle)
    }
}

/// Which side of the search form a suggestion list is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    From,
    To,
}

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 8;

const POPULAR_FROM: [&str; 5] = ["DEL", "BOM", "BLR", "MAA", "HYD"];
const POPULAR_TO: [&str; 5] = ["GOI", "CCU", "COK", "TRV", "IXM"];

pub fn catalog() -> &'static [Airport] {
    &AIRPORTS
}

pub fn by_code(code: &str) -> Option<&'static Airport> {
    AIRPORTS.iter().find(|a| a.code.eq_ignore_ascii_case(code))
}

/// Suggestions for a typed query. Queries shorter than `min_chars` suggest nothing.
pub fn suggest(query: &str, min_chars: usize, limit: usize) -> Vec<&'static Airport> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < min_chars {
        return Vec::new();
    }
    AIRPORTS.iter().filter(|a| a.matches(&needle)).take(limit).collect()
}

/// Shown when an empty input gains focus.
pub fn popular(direction: Direction) -> Vec<&'static Airport> {
    let codes = match direction {
        Direction::From => &POPULAR_FROM,
        Direction::To => &POPULAR_TO,
    };
    codes.iter().filter_map(|code| by_code(code)).collect()
}

/// `New Delhi (DEL)` gives `DEL`; anything without a bracketed code is trimmed and upper-cased.
pub fn extract_code(input: &str) -> String {
    let bracketed = input.char_indices().filter(|(_, c)| *c == '(').find_map(|(open, _)| {
        let candidate = input.get(open + 1..open + 4)?;
        let closes = input.get(open + 4..open + 5) == Some(")");
        let valid = candidate.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        (closes && valid).then(|| candidate.to_string())
    });
    bracketed.unwrap_or_else(|| input.trim().to_uppercase())
}

static AIRPORTS: [Airport; 99] = [
    Airport::new("DEL", "Indira Gandhi International Airport", "Delhi"),
    Airport::new("BOM", "Chhatrapati Shivaji Maharaj International Airport", "Mumbai"),
    Airport::new("MAA", "Chennai International Airport", "Chennai"),
    Airport::new("BLR", "Kempegowda International Airport", "Bangalore"),
    Airport::new("HYD", "Rajiv Gandhi International Airport", "Hyderabad"),
    Airport::new("CCU", "Netaji Subhas Chandra Bose International Airport", "Kolkata"),
    Airport::new("GOI", "Dabolim Airport", "Goa"),
    Airport::new("PNQ", "Pune Airport", "Pune"),
    Airport::new("COK", "Cochin International Airport", "Kochi"),
    Airport::new("TRV", "Trivandrum International Airport", "Thiruvananthapuram"),
    Airport::new("AMD", "Sardar Vallabhbhai Patel International Airport", "Ahmedabad"),
    Airport::new("JAI", "Jaipur International Airport", "Jaipur"),
    Airport::new("LKO", "Chaudhary Charan Singh Airport", "Lucknow"),
    Airport::new("VNS", "Lal Bahadur Shastri Airport", "Varanasi"),
    Airport::new("PAT", "Jay Prakash Narayan Airport", "Patna"),
    Airport::new("GAU", "Lokpriya Gopinath Bordoloi International Airport", "Guwahati"),
    Airport::new("IXR", "Birsa Munda Airport", "Ranchi"),
    Airport::new("BBI", "Biju Patnaik International Airport", "Bhubaneswar"),
    Airport::new("IXB", "Bagdogra International Airport", "Siliguri"),
    Airport::new("IXC", "Chandigarh International Airport", "Chandigarh"),
    Airport::new("IXJ", "Jammu Airport", "Jammu"),
    Airport::new("IXL", "Kushok Bakula Rimpochee Airport", "Leh"),
    Airport::new("IXM", "Madurai Airport", "Madurai"),
    Airport::new("IXZ", "Veer Savarkar International Airport", "Port Blair"),
    Airport::new("JDH", "Jodhpur Airport", "Jodhpur"),
    Airport::new("JLR", "Jabalpur Airport", "Jabalpur"),
    Airport::new("NAG", "Dr. Babasaheb Ambedkar International Airport", "Nagpur"),
    Airport::new("UDR", "Maharana Pratap Airport", "Udaipur"),
    Airport::new("VGA", "Vijayawada Airport", "Vijayawada"),
    Airport::new("VTZ", "Visakhapatnam International Airport", "Visakhapatnam"),
    Airport::new("IXE", "Mangalore International Airport", "Mangalore"),
    Airport::new("IXU", "Aurangabad Airport", "Aurangabad"),
    Airport::new("HBX", "Hubli Airport", "Hubli"),
    Airport::new("IDR", "Devi Ahilya Bai Holkar Airport", "Indore"),
    Airport::new("JRG", "Swami Vivekananda Airport", "Raipur"),
    Airport::new("JRH", "Jorhat Airport", "Jorhat"),
    Airport::new("IXS", "Silchar Airport", "Silchar"),
    Airport::new("IXI", "Lilabari Airport", "North Lakhimpur"),
    Airport::new("IXA", "Agartala Airport", "Agartala"),
    Airport::new("AJL", "Lengpui Airport", "Aizawl"),
    Airport::new("IXD", "Bamrauli Airport", "Allahabad"),
    Airport::new("IXG", "Belgaum Airport", "Belgaum"),
    Airport::new("BHO", "Raja Bhoj Airport", "Bhopal"),
    Airport::new("BHU", "Bhavnagar Airport", "Bhavnagar"),
    Airport::new("BHJ", "Bhuj Airport", "Bhuj"),
    Airport::new("BKB", "Nal Airport", "Bikaner"),
    Airport::new("PAB", "Bilaspur Airport", "Bilaspur"),
    Airport::new("CBD", "Car Nicobar Air Force Base", "Car Nicobar"),
    Airport::new("CCJ", "Calicut International Airport", "Kozhikode"),
    Airport::new("CJB", "Coimbatore International Airport", "Coimbatore"),
    Airport::new("DBD", "Dhanbad Airport", "Dhanbad"),
    Airport::new("DED", "Dehradun Airport", "Dehradun"),
    Airport::new("DEP", "Daporijo Airport", "Daporijo"),
    Airport::new("DHM", "Kangra Airport", "Dharamshala"),
    Airport::new("DIB", "Dibrugarh Airport", "Dibrugarh"),
    Airport::new("DIU", "Diu Airport", "Diu"),
    Airport::new("DMU", "Dimapur Airport", "Dimapur"),
    Airport::new("GAY", "Gaya Airport", "Gaya"),
    Airport::new("GOP", "Gorakhpur Airport", "Gorakhpur"),
    Airport::new("GWL", "Gwalior Airport", "Gwalior"),
    Airport::new("HSS", "Hisar Airport", "Hisar"),
    Airport::new("IMF", "Imphal Airport", "Imphal"),
    Airport::new("JGA", "Jamnagar Airport", "Jamnagar"),
    Airport::new("JGB", "Jagdalpur Airport", "Jagdalpur"),
    Airport::new("JSA", "Jaisalmer Airport", "Jaisalmer"),
    Airport::new("IXW", "Sonari Airport", "Jamshedpur"),
    Airport::new("KNU", "Kanpur Airport", "Kanpur"),
    Airport::new("KQH", "Kishangarh Airport", "Ajmer"),
    Airport::new("KTU", "Kota Airport", "Kota"),
    Airport::new("KUU", "Kullu–Manali Airport", "Kullu"),
    Airport::new("LUH", "Ludhiana Airport", "Ludhiana"),
    Airport::new("NDC", "Nanded Airport", "Nanded"),
    Airport::new("NMB", "Daman Airport", "Daman"),
    Airport::new("NVY", "Jawaharlal Nehru Airport", "Neyveli"),
    Airport::new("OMN", "Osmanabad Airport", "Osmanabad"),
    Airport::new("PGH", "Pantnagar Airport", "Pantnagar"),
    Airport::new("PBD", "Porbandar Airport", "Porbandar"),
    Airport::new("PED", "Phalodi Airport", "Phalodi"),
    Airport::new("PNY", "Pondicherry Airport", "Pondicherry"),
    Airport::new("PUT", "Sri Sathya Sai Airport", "Puttaparthi"),
    Airport::new("PYG", "Jeypore Airport", "Jeypore"),
    Airport::new("RAJ", "Rajkot Airport", "Rajkot"),
    Airport::new("RDP", "Kazi Nazrul Islam Airport", "Durgapur"),
    Airport::new("RGH", "Balurghat Airport", "Balurghat"),
    Airport::new("RJA", "Rajahmundry Airport", "Rajahmundry"),
    Airport::new("RPR", "Swami Vivekananda Airport", "Raipur"),
    Airport::new("RTC", "Ratnagiri Airport", "Ratnagiri"),
    Airport::new("RUP", "Rupsi Airport", "Dhubri"),
    Airport::new("SAG", "Shirdi Airport", "Shirdi"),
    Airport::new("SLV", "Shimla Airport", "Shimla"),
    Airport::new("STV", "Surat Airport", "Surat"),
    Airport::new("SXR", "Sheikh ul-Alam International Airport", "Srinagar"),
    Airport::new("TCR", "Tuticorin Airport", "Thoothukudi"),
    Airport::new("TIR", "Tirupati Airport", "Tirupati"),
    Airport::new("TJV", "Thanjavur Air Force Station", "Thanjavur"),
    Airport::new("TNI", "Satna Airport", "Satna"),
    Airport::new("TRZ", "Tiruchirappalli International Airport", "Tiruchirappalli"),
    Airport::new("WGC", "Warangal Airport", "Warangal"),
    Airport::new("ZER", "Ziro Airport", "Ziro"),
];
