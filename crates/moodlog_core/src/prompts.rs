//! crates/moodlog_core/src/prompts.rs
//!
//! Static per-language string tables used to direct the AI services. These
//! are data, not control flow: every table is a flat slice keyed by language
//! code (plus a handful of country-coded entries where the feedback path can
//! hand us a raw country code), and [`lookup`] falls back to the English
//! entry for anything unmapped.

/// Instruction telling the model which language to write in.
pub static WRITE_IN_LANGUAGE: &[(&str, &str)] = &[
    ("cn", "用中文写作。"),
    ("in", "हिंदी में लिखें।"),
    ("us", "Write in English."),
    ("id", "Menulis dalam bahasa Indonesia."),
    ("pk", "اردو میں لکھیں۔"),
    ("br", "Escreva em português."),
    ("ng", "Write in English."),
    ("bd", "বাংলায় লিখুন।"),
    ("ru", "Напишите на русском."),
    ("mx", "Escribe en español."),
    ("jp", "日本語で書いてください。"),
    ("ph", "Sumulat sa Filipino."),
    ("vn", "Viết bằng tiếng Việt."),
    ("eg", "اكتب باللغة العربية."),
    ("de", "Schreiben Sie auf Deutsch."),
    ("ir", "به فارسی بنویسید."),
    ("tr", "Türkçe yazın."),
    ("cd", "Écrivez en français."),
    ("fr", "Écrivez en français."),
    ("nl", "Schrijf in het Nederlands."),
    ("es", "Escribe en español."),
    ("pt", "Escreva em português."),
    ("ar", "اكتب باللغة العربية."),
    ("ko", "한국어로 작성하세요."),
    ("th", "เขียนเป็นภาษาไทย"),
    ("it", "Scrivi in italiano."),
    ("sv", "Skriv på svenska."),
    ("pl", "Napisz po polsku."),
    ("el", "Γράψτε στα ελληνικά."),
    ("he", "כתוב בעברית."),
    ("uk", "Напишіть українською."),
    ("cs", "Napište česky."),
    ("ro", "Scrieți în română."),
    ("hu", "Írj magyarul."),
    ("fi", "Kirjoita suomeksi."),
    ("da", "Skriv på dansk."),
    ("no", "Skriv på norsk."),
    ("bg", "Пишете на български."),
    ("hr", "Napišite na hrvatskom."),
    ("et", "Kirjutage eesti keeles."),
    ("ms", "Tulis dalam Bahasa Melayu."),
    ("sw", "Andika kwa Kiswahili."),
    ("af", "Skryf in Afrikaans."),
    ("ca", "Escriu en català."),
    ("bn", "বাংলায় লিখুন।"),
    ("ta", "தமிழில் எழுதுங்கள்."),
    ("te", "తెలుగులో రాయండి."),
    ("ur", "اردو میں لکھیں۔"),
    ("vi", "Viết bằng tiếng Việt."),
    ("zh", "用中文写作。"),
    ("hi", "हिंदी में लिखें।"),
    ("ja", "日本語で書いてください。"),
    ("en", "Write in English."),
];

/// System messages defining the AI coach persona in different languages.
pub static SYSTEM_PERSONAS: &[(&str, &str)] = &[
    ("en", "You are a helpful coach and motivator."),
    ("nl", "Jij bent een behulpzame coach en motivator."),
    ("es", "Eres un coach y motivador útil."),
    ("de", "Du bist ein hilfreicher Coach und Motivator."),
    ("fr", "Tu es un coach et un motivateur utile."),
    ("cn", "你是一位乐于助人的教练和激励者。"),
    ("in", "आप एक सहायक कोच और प्रेरक हैं।"),
    ("id", "Anda adalah pelatih dan motivator yang membantu."),
    ("pk", "آپ ایک مددگار کوچ اور محرک ہیں۔"),
    ("br", "Você é um coach e motivador útil."),
    ("ng", "You are a helpful coach and motivator."),
    ("bd", "আপনি একজন সহায়ক কোচ এবং প্রেরণাদাতা।"),
    ("ru", "Вы — полезный тренер и мотиватор."),
    ("mx", "Eres un coach y motivador útil."),
    ("jp", "あなたは役に立つコーチであり、モチベーターです。"),
    ("ph", "Ikaw ay isang matulungin na coach at motivator."),
    ("vn", "Bạn là một huấn luyện viên và người động viên hữu ích."),
    ("et", "እርስዎ አጋዥ አሰልጣኝ እና አነቃቂ ነዎት።"),
    ("eg", "أنت مدرب ومحفز مفيد."),
    ("ir", "شما یک مربی و انگیزه دهنده مفید هستید."),
    ("tr", "Yardımcı bir koç ve motivatörsünüz."),
    ("cd", "Tu es un coach et un motivateur utile."),
    ("pt", "Você é um coach e motivador útil."),
    ("ar", "أنت مدرب ومحفز مفيد."),
    ("zh", "你是一位乐于助人的教练和激励者。"),
    ("ja", "あなたは役に立つコーチであり、モチベーターです。"),
    ("ko", "당신은 도움이 되는 코치이자 동기 부여가입니다."),
    ("hi", "आप एक सहायक कोच और प्रेरक हैं।"),
    ("th", "คุณเป็นโค้ชและผู้สร้างแรงบันดาลใจที่เป็นประโยชน์"),
];

/// Advisory donation nudge shown after every 4th accepted chat turn.
pub static DONATION_MESSAGES: &[(&str, &str)] = &[
    ("nl", "💡 Zin in een kopje ☕? Doneer 1 Pi als je wilt 😉"),
    ("en", "💡 I could use a drink! Want to donate 1 Pi? 😉"),
    ("de", "💡 Ich könnte etwas trinken gebrauchen! Spende 1 Pi? 😉"),
    ("fr", "💡 Je prendrais bien un verre ! Donnez 1 Pi ? 😉"),
    ("es", "💡 ¡Me vendría bien una bebida! ¿Quieres donar 1 Pi? 😉"),
    ("zh", "💡 我想喝点东西！想捐赠 1 Pi 吗？ 😉"),
    ("pt", "💡 Eu poderia usar uma bebida! Quer doar 1 Pi? 😉"),
    ("ru", "💡 Мне бы не помешало выпить! Хотите пожертвовать 1 Pi? 😉"),
    ("ja", "💡 飲み物が欲しいです！ 1 Pi 寄付しませんか？ 😉"),
    ("vi", "💡 Tôi muốn uống gì đó! Bạn muốn quyên góp 1 Pi không? 😉"),
    ("ar", "💡 أرغب في تناول مشروب! هل تريد التبرع بـ 1 Pi؟ 😉"),
    ("fa", "💡 من یه نوشیدنی می‌خوام! می‌خوای 1 Pi اهدا کنی؟ 😉"),
    ("tr", "💡 Bir içki içebilirim! 1 Pi bağışlamak ister misin? 😉"),
    ("ko", "💡 마실 것이 필요해요! 1 Pi 기부하시겠어요? 😉"),
    ("th", "💡 อยากดื่มอะไรสักหน่อย! ต้องการบริจาค 1 Pi ไหม? 😉"),
];

/// System messages for the community aggregation analysis.
pub static ANALYSIS_SYSTEM_MESSAGES: &[(&str, &str)] = &[
    ("en", "You are an AI that analyzes and summarizes community feedback."),
    ("nl", "Jij bent een AI die community feedback analyseert en samenvat."),
    ("es", "Eres una IA que analiza y resume los comentarios de la comunidad."),
    ("de", "Du bist eine KI, die Community-Feedback analysiert und zusammenfasst."),
    ("fr", "Tu es une IA qui analyse et résume les retours de la communauté."),
    ("zh", "你是一个分析和总结社区反馈的人工智能。"),
    ("hi", "आप एक AI हैं जो सामुदायिक प्रतिक्रिया का विश्लेषण और सारांश करता है।"),
    ("id", "Anda adalah AI yang menganalisis dan merangkum umpan balik komunitas."),
    ("ur", "آپ ایک AI ہیں جو کمیونٹی کے تاثرات کا تجزیہ اور خلاصہ کرتا ہے۔"),
    ("pt", "Você é uma IA que analisa e resume o feedback da comunidade."),
    ("bn", "আপনি একজন AI যিনি সম্প্রদায়ের প্রতিক্রিয়া বিশ্লেষণ এবং সংক্ষিপ্তসার করেন।"),
    ("ru", "Вы — ИИ, который анализирует и обобщает отзывы сообщества."),
    ("ja", "あなたはコミュニティのフィードバックを分析し要約するAIです。"),
    ("tl", "Ikaw ay isang AI na nagsusuri at nagbubuod ng feedback ng komunidad."),
    ("vi", "Bạn là một AI phân tích và tóm tắt phản hồi của cộng đồng."),
    ("am", "እርስዎ የማህበረሰብ ግብረመልስን የሚተነትኑ እና የሚያጠቃልሉ AI ነዎት።"),
    ("ar", "أنت ذكاء اصطناعي يحلل ويلخص ملاحظات المجتمع."),
    ("fa", "شما یک هوش مصنوعی هستید که بازخورد جامعه را تجزیه و تحلیل و خلاصه می کند."),
    ("tr", "Topluluk geri bildirimlerini analiz eden ve özetleyen bir yapay zekasınız."),
    ("ko", "커뮤니티 피드백을 분석하고 요약하는 AI입니다."),
    ("th", "คุณคือ AI ที่วิเคราะห์และสรุปความคิดเห็นของชุมชน"),
];

/// User-facing instruction for the community aggregation analysis.
pub static ANALYSIS_INSTRUCTIONS: &[(&str, &str)] = &[
    ("en", "Analyze the following input provided by the community and provide a summary of the main themes and opinions. Respond in English."),
    ("nl", "Analyseer deze input van de community en geef een samenvatting van de belangrijkste thema's en meningen. Antwoord in het Nederlands."),
    ("es", "Analiza los siguientes comentarios proporcionados por la comunidad y proporciona un resumen de los temas y opiniones principales. Responde en español."),
    ("de", "Analysiere die folgenden Eingaben der Community und erstelle eine Zusammenfassung der Hauptthemen und Meinungen. Antworte auf Deutsch."),
    ("fr", "Analysez les commentaires suivants fournis par la communauté et fournissez un résumé des principaux thèmes et opinions. Répondez en français."),
    ("zh", "分析社区提供的以下反馈，并提供主要主题和意见的摘要。请用中文回答。"),
    ("hi", "समुदाय द्वारा प्रदान किए गए निम्नलिखित इनपुट का विश्लेषण करें और मुख्य विषयों और विचारों का सारांश प्रदान करें। हिंदी में उत्तर दें।"),
    ("id", "Analisis masukan berikut yang diberikan oleh komunitas dan berikan ringkasan tema dan opini utama. Tanggapi dalam Bahasa Indonesia."),
    ("ur", "کمیونٹی کی طرف سے فراہم کردہ درج ذیل ان پٹ کا تجزیہ کریں اور اہم موضوعات اور آراء کا خلاصہ فراہم کریں۔ اردو میں جواب دیں۔"),
    ("pt", "Analise a entrada a seguir fornecida pela comunidade e forneça um resumo dos principais temas e opiniões. Responda em português."),
    ("bn", "সম্প্রদায় দ্বারা প্রদত্ত নিম্নলিখিত ইনপুট বিশ্লেষণ করুন এবং প্রধান থিম এবং মতামতের একটি সারসংক্ষেপ প্রদান করুন। বাংলায় উত্তর দিন।"),
    ("ru", "Проанализируйте следующие данные, предоставленные сообществом, и предоставьте краткое изложение основных тем и мнений. Ответьте на русском языке."),
    ("ja", "コミュニティから提供された以下の入力を分析し、主要なテーマと意見の要約を提供してください。日本語で応答してください。"),
    ("tl", "Suriin ang sumusunod na input na ibinigay ng komunidad at magbigay ng buod ng mga pangunahing tema at opinyon. Tumugon sa Tagalog."),
    ("vi", "Phân tích đầu vào sau đây do cộng đồng cung cấp và cung cấp bản tóm tắt các chủ đề và ý kiến chính. Trả lời bằng tiếng Việt."),
    ("am", "በማህበረሰቡ የቀረበውን የሚከተለውን ግብአት ይተንትኑ እና የዋና ዋና ጭብጦችን እና አስተያየቶችን ማጠቃለያ ያቅርቡ። በአማርኛ ምላሽ ይስጡ።"),
    ("ar", "حلل المدخلات التالية المقدمة من المجتمع وقدم ملخصًا للمواضيع والآراء الرئيسية. أجب باللغة العربية."),
    ("fa", "ورودی زیر ارائه شده توسط جامعه را تجزیه و تحلیل کنید و خلاصه ای از موضوعات و نظرات اصلی ارائه دهید. به فارسی پاسخ دهید."),
    ("tr", "Topluluk tarafından sağlanan aşağıdaki girdiyi analiz edin ve ana temaların ve görüşlerin bir özetini sunun. Türkçe cevap verin."),
    ("ko", "커뮤니티에서 제공한 다음 입력을 분석하고 주요 주제 및 의견에 대한 요약을 제공하십시오. 한국어로 응답하십시오."),
    ("th", "วิเคราะห์ข้อมูลต่อไปนี้ที่ชุมชนให้มาและสรุปประเด็นหลักและความคิดเห็น ตอบเป็นภาษาไทย"),
];

/// Shown when no analysis has been generated yet.
pub static NO_ANALYSIS_MESSAGES: &[(&str, &str)] = &[
    ("en", "No community analysis has been generated yet. Submit more input!"),
    ("nl", "Er is nog geen community-analyse gegenereerd. Stuur meer input in!"),
];

/// English names of the supported languages, used inside chat system prompts
/// ("Respond ONLY in Dutch.") and the analysis closing instruction.
pub static LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("nl", "Dutch"),
    ("en", "English"),
    ("de", "German"),
    ("fr", "French"),
    ("es", "Spanish"),
    ("zh", "Chinese"),
    ("hi", "Hindi"),
    ("id", "Indonesian"),
    ("ur", "Urdu"),
    ("pt", "Portuguese"),
    ("bn", "Bengali"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("tl", "Tagalog"),
    ("vi", "Vietnamese"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("fa", "Persian"),
    ("tr", "Turkish"),
    ("ko", "Korean"),
    ("th", "Thai"),
];

/// Looks up a language-keyed entry, falling back to the English one.
/// Every table above carries an "en" entry, so the fallback is total.
pub fn lookup<'a>(table: &'a [(&'a str, &'a str)], lang: &str) -> &'a str {
    table
        .iter()
        .find(|(code, _)| *code == lang)
        .or_else(|| table.iter().find(|(code, _)| *code == "en"))
        .map(|(_, text)| *text)
        .unwrap_or("")
}

/// English name for a language code, defaulting to "English".
pub fn language_name(lang: &str) -> &'static str {
    LANGUAGE_NAMES
        .iter()
        .find(|(code, _)| *code == lang)
        .map(|(_, name)| *name)
        .unwrap_or("English")
}
