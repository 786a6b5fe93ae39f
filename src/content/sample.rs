//! Built-in sample letter. Identity values are placeholders.

use super::{
    Labels, LanguageVariant, LegalArgument, LegalSection, Letter, LetterContent, PassportEntry,
    PassportFacts, PassportField,
};

pub(super) fn letter() -> Letter {
    Letter {
        primary: chinese(),
        secondary: Some(english()),
        legal_argument: Some(legal_argument()),
    }
}

fn chinese() -> LanguageVariant {
    LanguageVariant {
        language: "zh-CN".to_owned(),
        labels: Labels {
            table_heading: "申请人信息 / 护照信息".to_owned(),
            subject_prefix: "主题".to_owned(),
            background: "背景说明".to_owned(),
            justification: "理由说明".to_owned(),
            request: "请求".to_owned(),
            repayment_plan: "资产追偿计划".to_owned(),
            variant_title: None,
            utc_caption: "协调世界时".to_owned(),
            local_caption: "当地时间".to_owned(),
            zone_caption: "时区".to_owned(),
        },
        content: LetterContent {
            recipient: "致：北京首都国际机场（PEK）移民管理官员".to_owned(),
            subject: "关于申请中华人民共和国政治庇护".to_owned(),
            background: "申请人长期受到骚扰和恐吓，上述行为对其人身安全和自由构成严重威胁。"
                .to_owned(),
            justification: concat!(
                "本人依据《中华人民共和国宪法》第三十二条及相关国际公约，恳请贵方给予政治庇护。",
                "如继续处于原居住国管辖之下，我将面临持续的骚扰、恐吓和威胁，严重危及我的人身安全与自由。",
                "我愿意充分配合，提交全部支持文件，并在审查期间遵守所有程序要求。"
            )
            .to_owned(),
            request: concat!(
                "恳请贵方受理本申请，并依据中国法律及国际法给予我难民应有的法律保护。",
                "我随时可以接受面谈并提供任何补充材料。"
            )
            .to_owned(),
            repayment_plan:
                "我将仅通过合法途径追回被侵占的资产，并在获准接入网络后立即采取加密措施保护敏感文件。"
                    .to_owned(),
            signature: "此致\n\n申请人 敬上".to_owned(),
        },
        passport: PassportFacts::new(vec![
            PassportEntry::new(PassportField::Name, "姓名", "SAMPLE APPLICANT"),
            PassportEntry::new(PassportField::Nationality, "国籍", "美利坚合众国"),
            PassportEntry::new(PassportField::DocumentNumber, "护照号码", "X00000000"),
            PassportEntry::new(PassportField::BirthDate, "出生日期", "1990年1月1日"),
            PassportEntry::new(PassportField::BirthPlace, "出生地点", "中国"),
            PassportEntry::new(PassportField::IssueDate, "签发日期", "2020年1月1日"),
            PassportEntry::new(PassportField::ExpiryDate, "有效期至", "2030年1月1日"),
        ]),
    }
}

fn english() -> LanguageVariant {
    LanguageVariant {
        language: "en".to_owned(),
        labels: Labels {
            table_heading: "Applicant / Passport Information".to_owned(),
            subject_prefix: "Subject".to_owned(),
            background: "Background".to_owned(),
            justification: "Justification".to_owned(),
            request: "Request".to_owned(),
            repayment_plan: "Asset Recovery Plan".to_owned(),
            variant_title: Some("English Translation".to_owned()),
            utc_caption: "Coordinated Universal Time".to_owned(),
            local_caption: "Local time".to_owned(),
            zone_caption: "time zone".to_owned(),
        },
        content: LetterContent {
            recipient: "To: Immigration Officer, Beijing Capital International Airport (PEK)"
                .to_owned(),
            subject: "Application for Political Asylum in the People's Republic of China"
                .to_owned(),
            background: concat!(
                "The applicant has been subjected to sustained harassment and intimidation, ",
                "actions that pose a serious threat to the applicant's personal safety and freedom."
            )
            .to_owned(),
            justification: concat!(
                "Pursuant to Article 32 of the Constitution of the People's Republic of China and the ",
                "relevant international conventions, I respectfully request political asylum. If I remain ",
                "under the jurisdiction of my country of residence, I will continue to face harassment, ",
                "intimidation and threats that severely endanger my personal safety and freedom. I am ",
                "willing to cooperate fully, submit all supporting documents and comply with every ",
                "procedural requirement during the review period."
            )
            .to_owned(),
            request: concat!(
                "I respectfully request that you accept this application and, in accordance with Chinese ",
                "and international law, grant me the legal protection afforded to refugees. I am available ",
                "for an interview at any time and can provide any additional information."
            )
            .to_owned(),
            repayment_plan: concat!(
                "I will pursue the recovery of misappropriated assets solely through lawful channels and ",
                "will deploy encryption measures to safeguard sensitive files as soon as network access ",
                "is permitted."
            )
            .to_owned(),
            signature: "Sincerely,\n\nThe Applicant".to_owned(),
        },
        passport: PassportFacts::new(vec![
            PassportEntry::new(PassportField::Name, "Name", "SAMPLE APPLICANT"),
            PassportEntry::new(
                PassportField::Nationality,
                "Nationality",
                "United States of America",
            ),
            PassportEntry::new(PassportField::DocumentNumber, "Passport No.", "X00000000"),
            PassportEntry::new(PassportField::BirthDate, "Date of Birth", "1 January 1990"),
            PassportEntry::new(PassportField::BirthPlace, "Place of Birth", "China"),
            PassportEntry::new(PassportField::IssueDate, "Date of Issue", "1 January 2020"),
            PassportEntry::new(PassportField::ExpiryDate, "Date of Expiry", "1 January 2030"),
        ]),
    }
}

fn legal_argument() -> LegalArgument {
    LegalArgument {
        heading: "Legal Arguments".to_owned(),
        preliminary: Some(
            concat!(
                "The following arguments rest on facts that have not been independently verified. ",
                "They do not constitute a finding of fact and are provided to outline the applicable ",
                "legal framework."
            )
            .to_owned(),
        ),
        sections: vec![
            LegalSection::new(
                "I. Constitutional Basis for Asylum",
                concat!(
                    "Article 32 of the Constitution of the People's Republic of China provides that the ",
                    "State may grant asylum to foreigners who request it for political reasons. The ",
                    "applicant invokes this provision as the primary basis of the present request."
                ),
            ),
            LegalSection::new(
                "II. Right to Seek Asylum",
                concat!(
                    "Article 14 of the Universal Declaration of Human Rights recognizes the right of ",
                    "everyone to seek and to enjoy in other countries asylum from persecution."
                ),
            ),
            LegalSection::new(
                "III. Principle of Non-Refoulement",
                concat!(
                    "Article 33 of the 1951 Convention relating to the Status of Refugees, to which the ",
                    "People's Republic of China acceded in 1982, prohibits returning a refugee to ",
                    "territories where their life or freedom would be threatened."
                ),
            ),
            LegalSection::new(
                "IV. Status Pending Review",
                concat!(
                    "Under Article 46 of the Exit and Entry Administration Law of the People's Republic ",
                    "of China, a foreigner applying for refugee status may stay in China during the ",
                    "screening process on a temporary identity certificate issued by the public ",
                    "security authorities."
                ),
            ),
        ],
    }
}
