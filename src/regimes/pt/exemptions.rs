use crate::cbc::{Definition, I18n};

/// Extension holding the AT exemption reason of a VAT combo.
pub const EXT_KEY_EXEMPTION: &str = "pt-saft-exemption";

/// An exemption reason of the Portuguese tax authority with the legacy
/// rate key it used to be expressed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exemption {
    pub code: &'static str,
    pub rate: &'static str,
    pub en: &'static str,
    /// Legal text printed on documents.
    pub pt: &'static str,
}

pub const EXEMPTIONS: &[Exemption] = &[
    Exemption {
        code: "M01",
        rate: "exempt+outlay",
        en: "Article 16, No. 6 of the VAT code",
        pt: "Artigo 16.°, n.° 6 do CIVA",
    },
    Exemption {
        code: "M02",
        rate: "exempt+intrastate-export",
        en: "Article 6 of the Decree-Law 198/90 of 19th June",
        pt: "Artigo 6.° do Decreto-Lei n.° 198/90, de 19 de junho",
    },
    Exemption {
        code: "M04",
        rate: "exempt+imports",
        en: "Exempt pursuant to article 13 of the VAT code",
        pt: "Isento artigo 13.° do CIVA",
    },
    Exemption {
        code: "M05",
        rate: "exempt+exports",
        en: "Exempt pursuant to article 14 of the VAT code",
        pt: "Isento artigo 14.° do CIVA",
    },
    Exemption {
        code: "M06",
        rate: "exempt+suspension-scheme",
        en: "Exempt pursuant to article 15 of the VAT code",
        pt: "Isento artigo 15.° do CIVA",
    },
    Exemption {
        code: "M07",
        rate: "exempt+internal-operations",
        en: "Exempt pursuant to article 9 of the VAT code",
        pt: "Isento artigo 9.° do CIVA",
    },
    Exemption {
        code: "M09",
        rate: "exempt+small-retail-scheme",
        en: "VAT - does not confer right to deduct / Article 62 paragraph b) of the VAT code",
        pt: "IVA - não confere direito a dedução / Artigo 62.° alínea b) do CIVA",
    },
    Exemption {
        code: "M10",
        rate: "exempt+exempt-scheme",
        en: "VAT - exemption scheme / Article 57 of the VAT code",
        pt: "IVA - regime de isenção / Artigo 57.° do CIVA",
    },
    Exemption {
        code: "M11",
        rate: "exempt+tobacco-scheme",
        en: "Special scheme for tobacco / Decree-Law No. 346/85 of 23rd August",
        pt: "Regime particular do tabaco / Decreto-Lei n.° 346/85, de 23 de agosto",
    },
    Exemption {
        code: "M12",
        rate: "exempt+margin-scheme+travel",
        en: "Margin scheme - Travel agencies / Decree-Law No. 221/85 of 3rd July",
        pt: "Regime da margem de lucro - Agências de viagens / Decreto-Lei n.° 221/85, de 3 de julho",
    },
    Exemption {
        code: "M13",
        rate: "exempt+margin-scheme+second-hand",
        en: "Margin scheme - Second-hand goods / Decree-Law No. 199/96 of 18th October",
        pt: "Regime da margem de lucro - Bens em segunda mão / Decreto-Lei n.° 199/96, de 18 de outubro",
    },
    Exemption {
        code: "M14",
        rate: "exempt+margin-scheme+art",
        en: "Margin scheme - Works of art / Decree-Law No. 199/96 of 18th October",
        pt: "Regime da margem de lucro - Objetos de arte / Decreto-Lei n.° 199/96, de 18 de outubro",
    },
    Exemption {
        code: "M15",
        rate: "exempt+margin-scheme+antiques",
        en: "Margin scheme - Collector’s items and antiques / Decree-Law No. 199/96 of 18th October",
        pt: "Regime da margem de lucro - Objetos de coleção e antiguidades / Decreto-Lei n.° 199/96, de 18 de outubro",
    },
    Exemption {
        code: "M16",
        rate: "exempt+goods-transmission",
        en: "Exempt pursuant to Article 14 of the RITI",
        pt: "Isento artigo 14.° do RITI",
    },
    Exemption {
        code: "M19",
        rate: "exempt+other",
        en: "Other exemptions - Temporary exemptions determined by specific legislation",
        pt: "Outras isenções - Isenções temporárias determinadas em diploma próprio",
    },
    Exemption {
        code: "M20",
        rate: "exempt+flat-rate-scheme",
        en: "VAT - flat-rate scheme / Article 59-D No. 2 of the VAT code",
        pt: "IVA - regime forfetário / Artigo 59.°-D n.°2 do CIVA",
    },
    Exemption {
        code: "M21",
        rate: "exempt+non-deductible",
        en: "VAT - does not confer right to deduct (or similar) - Article 72 No. 4 of the VAT code",
        pt: "IVA - não confere direito à dedução (ou expressão similar) - Artigo 72.° n.° 4 do CIVA",
    },
    Exemption {
        code: "M25",
        rate: "exempt+consignment-goods",
        en: "Consignment goods - Article 38 No. 1 paragraph a) of the VAT code",
        pt: "Mercadorias à consignação - Artigo 38.° n.° 1 alínea a) do CIVA",
    },
    Exemption {
        code: "M30",
        rate: "exempt+reverse-charge+waste",
        en: "VAT - reverse charge / Article 2 No. 1 paragraph i) of the VAT code",
        pt: "IVA - autoliquidação / Artigo 2.° n.° 1 alínea i) do CIVA",
    },
    Exemption {
        code: "M31",
        rate: "exempt+reverse-charge+civil-eng",
        en: "VAT - reverse charge / Article 2 No. 1 paragraph j) of the VAT code",
        pt: "IVA - autoliquidação / Artigo 2.° n.° 1 alínea j) do CIVA",
    },
    Exemption {
        code: "M32",
        rate: "exempt+reverse-charge+greenhouse",
        en: "VAT - reverse charge / Article 2 No. 1 paragraph l) of the VAT code",
        pt: "IVA - autoliquidação / Artigo 2.° n.° 1 alínea I) do CIVA",
    },
    Exemption {
        code: "M33",
        rate: "exempt+reverse-charge+woods",
        en: "VAT - reverse charge / Article 2 No. 1 paragraph m) of the VAT code",
        pt: "IVA - autoliquidação / Artigo 2.° n.° 1 alínea m) do CIVA",
    },
    Exemption {
        code: "M40",
        rate: "exempt+reverse-charge+b2b",
        en: "VAT - reverse charge / Article 6 No. 6 paragraph a) of the VAT code, to the contrary",
        pt: "IVA - autoliquidação / Artigo 6.° n.° 6 alínea a) do CIVA, a contrário",
    },
    Exemption {
        code: "M41",
        rate: "exempt+reverse-charge+intraeu",
        en: "VAT - reverse charge / Article 8 No. 3 of the RITI",
        pt: "IVA - autoliquidação / Artigo 8.° n.° 3 do RITI",
    },
    Exemption {
        code: "M42",
        rate: "exempt+reverse-charge+real-estate",
        en: "VAT - reverse charge / Decree-Law No. 21/2007 of 29 January",
        pt: "IVA - autoliquidação / Decreto-Lei n.° 21/2007, de 29 de janeiro",
    },
    Exemption {
        code: "M43",
        rate: "exempt+reverse-charge+gold",
        en: "VAT - reverse charge / Decree-Law No. 362/99 of 16th September",
        pt: "IVA - autoliquidação / Decreto-Lei n.° 362/99, de 16 de setembro",
    },
    Exemption {
        code: "M99",
        rate: "exempt+non-taxable",
        en: "Not subject to tax or not taxed",
        pt: "Não sujeito ou não tributado",
    },
];

pub fn exemption(code: &str) -> Option<&'static Exemption> {
    EXEMPTIONS.iter().find(|e| e.code == code)
}

pub(super) fn exemption_extension() -> Definition {
    Definition::key(
        EXT_KEY_EXEMPTION,
        I18n::en("Tax exemption reason code").with("pt", "Código do motivo de isenção de imposto"),
    )
    .values(
        EXEMPTIONS
            .iter()
            .map(|e| Definition::code(e.code, I18n::en(e.en).with("pt", e.pt)))
            .collect(),
    )
}
